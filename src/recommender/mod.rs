//! Method-call recommendation
//!
//! The evaluator only depends on [`RankedRetriever`]. [`MethodCallRecommender`]
//! is the bundled implementation: it ranks every method observed in the model
//! for the query's receiver type by a weighted multi-factor similarity.

mod model;
mod similarity;

pub use model::{ModelEntry, ModelError, ModelStore};
pub use similarity::{score, FactorWeights};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::query::Query;

/// Per-factor similarity between a query and a model observation
///
/// All values are in `[0.0, 1.0]`. `similarity` is the weighted combination of
/// the eight factors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    pub similarity: f64,
    pub receiver_type: f64,
    pub required_type: f64,
    pub object_origin: f64,
    pub surrounding_expression: f64,
    pub enclosing_method_return_type: f64,
    pub enclosing_method_parameter_size: f64,
    pub enclosing_method_parameters: f64,
    pub enclosing_method_super: f64,
}

impl SimilarityBreakdown {
    /// Number of scores in a breakdown
    pub const LEN: usize = 9;

    /// Scores in report column order, overall similarity first
    pub fn scores(&self) -> [f64; Self::LEN] {
        [
            self.similarity,
            self.receiver_type,
            self.required_type,
            self.object_origin,
            self.surrounding_expression,
            self.enclosing_method_return_type,
            self.enclosing_method_parameter_size,
            self.enclosing_method_parameters,
            self.enclosing_method_super,
        ]
    }
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Fully qualified method identifier
    pub method: String,
    pub breakdown: SimilarityBreakdown,
}

impl CandidateResult {
    pub fn new(method: impl Into<String>, breakdown: SimilarityBreakdown) -> Self {
        Self {
            method: method.into(),
            breakdown,
        }
    }

    pub fn similarity(&self) -> f64 {
        self.breakdown.similarity
    }
}

/// A recommender that ranks candidate methods for a query
pub trait RankedRetriever: Send + Sync {
    /// Candidates ordered by descending overall similarity
    ///
    /// An empty vector means the recommender had nothing to offer.
    fn retrieve(&self, query: &Query) -> Vec<CandidateResult>;
}

/// Sort candidates by descending similarity, ties by method name
pub fn rank(candidates: &mut [CandidateResult]) {
    candidates.sort_by(|a, b| {
        b.similarity()
            .total_cmp(&a.similarity())
            .then_with(|| a.method.cmp(&b.method))
    });
}

/// Nearest-observation recommender backed by a [`ModelStore`]
pub struct MethodCallRecommender {
    model: ModelStore,
    weights: FactorWeights,
}

impl MethodCallRecommender {
    pub fn new(model: ModelStore) -> Self {
        Self {
            model,
            weights: FactorWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: FactorWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn model(&self) -> &ModelStore {
        &self.model
    }
}

impl RankedRetriever for MethodCallRecommender {
    fn retrieve(&self, query: &Query) -> Vec<CandidateResult> {
        let entries = self.model.entries_for(&query.receiver_type);

        // Best-scoring observation per method
        let mut best: HashMap<&str, SimilarityBreakdown> = HashMap::new();
        for entry in entries {
            let breakdown = score(query, &entry.query, &self.weights);
            best.entry(entry.method.as_str())
                .and_modify(|current| {
                    if breakdown.similarity > current.similarity {
                        *current = breakdown;
                    }
                })
                .or_insert(breakdown);
        }

        let mut candidates: Vec<CandidateResult> = best
            .into_iter()
            .map(|(method, breakdown)| CandidateResult::new(method, breakdown))
            .collect();
        rank(&mut candidates);

        tracing::trace!(
            receiver = %query.receiver_type,
            observations = entries.len(),
            candidates = candidates.len(),
            "Retrieved candidates"
        );
        candidates
    }
}
