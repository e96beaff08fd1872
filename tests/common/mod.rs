//! Shared fixtures for integration tests: event builders and archive/model writers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use completion_eval::event::{
    CompletionEvent, Context, EnclosingMethod, IdeEvent, Invocation, Name, NameKind, ObjectOrigin,
    Proposal, ProposalSelection, SurroundingExpression, TerminationState,
};
use completion_eval::recommender::ModelEntry;
use completion_eval::{CandidateResult, Query, RankedRetriever, SimilarityBreakdown};

/// An invocation on `receiver` that called `method`
pub fn invocation(receiver: &str, method: Option<&str>) -> Invocation {
    Invocation {
        receiver_type: receiver.to_string(),
        required_type: Some("int".to_string()),
        object_origin: ObjectOrigin::Local,
        surrounding_expression: SurroundingExpression::Assignment,
        method: method.map(String::from),
    }
}

pub fn context(invocations: Vec<Invocation>) -> Context {
    Context {
        enclosing_type: Some("App".to_string()),
        enclosing_method: Some(EnclosingMethod {
            name: "run".to_string(),
            return_type: "void".to_string(),
            parameters: vec!["String".to_string()],
            super_method: None,
        }),
        invocations,
    }
}

/// A completion event whose last selection has the given kind
pub fn completion_with(
    state: TerminationState,
    selected: Option<(NameKind, &str)>,
    invocations: Vec<Invocation>,
) -> IdeEvent {
    IdeEvent::Completion(CompletionEvent {
        context: context(invocations),
        terminated_state: state,
        selections: selected
            .into_iter()
            .map(|(kind, id)| ProposalSelection {
                proposal: Proposal::new(Name {
                    kind,
                    identifier: id.to_string(),
                }),
                selected_after_ms: Some(250),
            })
            .collect(),
    })
}

/// An applied completion of method `selected`
pub fn applied(selected: &str, invocations: Vec<Invocation>) -> IdeEvent {
    completion_with(
        TerminationState::Applied,
        Some((NameKind::Method, selected)),
        invocations,
    )
}

/// Write events as a JSON Lines archive
pub fn write_archive(dir: &Path, name: &str, events: &[IdeEvent]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::new();
    for event in events {
        content.push_str(&serde_json::to_string(event).expect("serialize event"));
        content.push('\n');
    }
    std::fs::write(&path, content).expect("write archive");
    path
}

/// Write a single-file model
pub fn write_model(dir: &Path, entries: &[ModelEntry]) {
    std::fs::create_dir_all(dir).expect("create model dir");
    let json = serde_json::to_string_pretty(entries).expect("serialize model");
    std::fs::write(dir.join("model.json"), json).expect("write model");
}

/// A model entry observed at `invocation(receiver, Some(method))` in [`context`]
pub fn model_entry(receiver: &str, method: &str, required: Option<&str>) -> ModelEntry {
    ModelEntry {
        query: Query {
            receiver_type: receiver.to_string(),
            required_type: required.map(String::from),
            object_origin: ObjectOrigin::Local,
            surrounding_expression: SurroundingExpression::Assignment,
            enclosing_method_return_type: "void".to_string(),
            enclosing_method_parameter_size: 1,
            enclosing_method_parameters: vec!["String".to_string()],
            enclosing_method_super: None,
        },
        method: method.to_string(),
    }
}

/// Breakdown with every factor set from a seed, so columns are distinguishable
pub fn breakdown(similarity: f64) -> SimilarityBreakdown {
    SimilarityBreakdown {
        similarity,
        receiver_type: 1.0,
        required_type: 0.5,
        object_origin: 0.25,
        surrounding_expression: 0.125,
        enclosing_method_return_type: 1.0,
        enclosing_method_parameter_size: 0.75,
        enclosing_method_parameters: 0.0,
        enclosing_method_super: 1.0,
    }
}

/// Retriever returning a fixed ranked list for every query
pub struct StubRetriever(pub Vec<CandidateResult>);

impl StubRetriever {
    pub fn new(candidates: &[(&str, f64)]) -> Self {
        Self(
            candidates
                .iter()
                .map(|(name, sim)| CandidateResult::new(*name, breakdown(*sim)))
                .collect(),
        )
    }
}

impl RankedRetriever for StubRetriever {
    fn retrieve(&self, _query: &Query) -> Vec<CandidateResult> {
        self.0.clone()
    }
}
