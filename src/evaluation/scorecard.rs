//! Evaluation records and their aggregation

use serde::Serialize;

use crate::recommender::CandidateResult;

/// Ranked results kept per evaluated event
pub const MAX_RANKED_RESULTS: usize = 10;

/// Outcome of looking up the accepted method among reconstructed queries
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No reconstructed query selected the accepted method
    Unmatched,
    /// Ranked recommendations for the matched query, at most [`MAX_RANKED_RESULTS`]
    Matched(Vec<CandidateResult>),
}

/// One row of the scorecard
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    /// Identifier of the method the developer accepted
    pub selected_method: String,
    pub outcome: Outcome,
}

impl EvaluationRecord {
    pub fn unmatched(selected_method: impl Into<String>) -> Self {
        Self {
            selected_method: selected_method.into(),
            outcome: Outcome::Unmatched,
        }
    }

    /// Build a matched record, keeping the first [`MAX_RANKED_RESULTS`] results
    pub fn matched(selected_method: impl Into<String>, mut results: Vec<CandidateResult>) -> Self {
        results.truncate(MAX_RANKED_RESULTS);
        Self {
            selected_method: selected_method.into(),
            outcome: Outcome::Matched(results),
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, Outcome::Matched(_))
    }

    /// Ranked results, `None` when unmatched
    pub fn ranked_results(&self) -> Option<&[CandidateResult]> {
        match &self.outcome {
            Outcome::Matched(results) => Some(results),
            Outcome::Unmatched => None,
        }
    }

    /// 1-based rank of the accepted method among the results
    pub fn rank_of_selected(&self) -> Option<usize> {
        self.ranked_results()?
            .iter()
            .position(|c| c.method == self.selected_method)
            .map(|i| i + 1)
    }
}

/// Accumulated evaluation records, in processing order
#[derive(Debug, Default, Clone)]
pub struct Scorecard {
    records: Vec<EvaluationRecord>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EvaluationRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = EvaluationRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<EvaluationRecord> {
        self.records
    }

    /// Accuracy figures over the matched records
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            evaluated: self.records.len(),
            ..Default::default()
        };
        let mut reciprocal_sum = 0.0;
        let mut hits = [0usize; 3];

        for record in &self.records {
            let Some(results) = record.ranked_results() else {
                summary.unmatched += 1;
                continue;
            };
            summary.matched += 1;
            if results.is_empty() {
                summary.empty_results += 1;
            }
            if let Some(rank) = record.rank_of_selected() {
                reciprocal_sum += 1.0 / rank as f64;
                for (slot, k) in [1, 5, 10].into_iter().enumerate() {
                    if rank <= k {
                        hits[slot] += 1;
                    }
                }
            }
        }

        if summary.matched > 0 {
            let matched = summary.matched as f64;
            summary.hit_at_1 = hits[0] as f64 / matched;
            summary.hit_at_5 = hits[1] as f64 / matched;
            summary.hit_at_10 = hits[2] as f64 / matched;
            summary.mrr = reciprocal_sum / matched;
        }
        summary
    }
}

/// Aggregate accuracy of a scorecard
///
/// Hit rates and MRR are computed over matched records only; unmatched
/// records say nothing about ranking quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub evaluated: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Matched records for which the recommender returned nothing
    pub empty_results: usize,
    pub hit_at_1: f64,
    pub hit_at_5: f64,
    pub hit_at_10: f64,
    pub mrr: f64,
}
