//! IDE event data model
//!
//! Events are read from archives as JSON records tagged by `"type"`. Only
//! completion events carry data the evaluator cares about; every other tag
//! deserializes to [`IdeEvent::Other`] and is skipped downstream.

use serde::{Deserialize, Serialize};

/// A single recorded IDE interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdeEvent {
    /// The IDE offered completion proposals
    Completion(CompletionEvent),
    /// Any other event kind (commands, edits, navigation, ...)
    #[serde(other)]
    Other,
}

impl IdeEvent {
    /// The completion payload, if this is a completion event
    pub fn as_completion(&self) -> Option<&CompletionEvent> {
        match self {
            IdeEvent::Completion(ce) => Some(ce),
            IdeEvent::Other => None,
        }
    }
}

/// How a completion session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminationState {
    Applied,
    Cancelled,
    Filtered,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Kind discriminator of a proposal name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    Method,
    Type,
    Field,
    Property,
    Event,
    Namespace,
    Variable,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Name of a proposed code element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub kind: NameKind,
    pub identifier: String,
}

impl Name {
    pub fn method(identifier: impl Into<String>) -> Self {
        Self {
            kind: NameKind::Method,
            identifier: identifier.into(),
        }
    }

    pub fn is_method(&self) -> bool {
        self.kind == NameKind::Method
    }
}

/// One candidate offered by the IDE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<i32>,
}

impl Proposal {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            relevance: None,
        }
    }
}

/// A proposal the developer moved the selection to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSelection {
    pub proposal: Proposal,
    /// Milliseconds since the completion popup opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_after_ms: Option<u64>,
}

/// Enclosing method of the edit location
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclosingMethod {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<String>,
    /// Method this one overrides or implements, if any
    pub super_method: Option<String>,
}

/// Where the receiver object of an invocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectOrigin {
    Parameter,
    Field,
    Property,
    Local,
    Call,
    This,
    Static,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Syntactic position an invocation appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurroundingExpression {
    Assignment,
    MethodParameter,
    Return,
    Condition,
    Loop,
    Statement,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A method invocation recorded in the edited method body
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Invocation {
    pub receiver_type: String,
    /// Type expected at the invocation site, if the site constrains it
    pub required_type: Option<String>,
    pub object_origin: ObjectOrigin,
    pub surrounding_expression: SurroundingExpression,
    /// Identifier of the invoked method; absent if it could not be resolved
    pub method: Option<String>,
}

/// Snapshot of the code around a completion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub enclosing_type: Option<String>,
    pub enclosing_method: Option<EnclosingMethod>,
    /// Invocations in source order
    pub invocations: Vec<Invocation>,
}

/// A recorded completion session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub terminated_state: TerminationState,
    #[serde(default)]
    pub selections: Vec<ProposalSelection>,
}

impl CompletionEvent {
    /// The proposal selected last, i.e. the one accepted when the session applied
    pub fn last_selected_proposal(&self) -> Option<&Proposal> {
        self.selections.last().map(|s| &s.proposal)
    }
}
