//! Factor-wise query similarity

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::SimilarityBreakdown;
use crate::query::Query;

/// Relative weight of each factor in the overall similarity
///
/// Weights are normalized by their sum, so they need not add up to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub receiver_type: f64,
    pub required_type: f64,
    pub object_origin: f64,
    pub surrounding_expression: f64,
    pub enclosing_method_return_type: f64,
    pub enclosing_method_parameter_size: f64,
    pub enclosing_method_parameters: f64,
    pub enclosing_method_super: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            receiver_type: 0.10,
            required_type: 0.20,
            object_origin: 0.15,
            surrounding_expression: 0.15,
            enclosing_method_return_type: 0.10,
            enclosing_method_parameter_size: 0.05,
            enclosing_method_parameters: 0.10,
            enclosing_method_super: 0.15,
        }
    }
}

impl FactorWeights {
    fn as_array(&self) -> [f64; 8] {
        [
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

fn equal<T: PartialEq>(a: &T, b: &T) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// `1 - |a - b| / max(a, b)`; two zero counts are identical
fn count_similarity(a: usize, b: usize) -> f64 {
    let max = a.max(b);
    if max == 0 {
        return 1.0;
    }
    1.0 - (a.abs_diff(b) as f64 / max as f64)
}

/// Multiset Jaccard similarity of two parameter type lists
fn parameter_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for p in a {
        counts.entry(p.as_str()).or_default().0 += 1;
    }
    for p in b {
        counts.entry(p.as_str()).or_default().1 += 1;
    }
    let (intersection, union) = counts
        .values()
        .fold((0usize, 0usize), |(i, u), &(x, y)| (i + x.min(y), u + x.max(y)));
    intersection as f64 / union as f64
}

/// Score an observed query against the current query
pub fn score(query: &Query, observed: &Query, weights: &FactorWeights) -> SimilarityBreakdown {
    let factors = [
        equal(&query.receiver_type, &observed.receiver_type),
        equal(&query.required_type, &observed.required_type),
        equal(&query.object_origin, &observed.object_origin),
        equal(&query.surrounding_expression, &observed.surrounding_expression),
        equal(
            &query.enclosing_method_return_type,
            &observed.enclosing_method_return_type,
        ),
        count_similarity(
            query.enclosing_method_parameter_size,
            observed.enclosing_method_parameter_size,
        ),
        parameter_similarity(
            &query.enclosing_method_parameters,
            &observed.enclosing_method_parameters,
        ),
        equal(&query.enclosing_method_super, &observed.enclosing_method_super),
    ];

    let w = weights.as_array();
    let total: f64 = w.iter().sum();
    let similarity = if total > 0.0 {
        factors.iter().zip(w.iter()).map(|(f, w)| f * w).sum::<f64>() / total
    } else {
        0.0
    };

    SimilarityBreakdown {
        similarity,
        receiver_type: factors[0],
        required_type: factors[1],
        object_origin: factors[2],
        surrounding_expression: factors[3],
        enclosing_method_return_type: factors[4],
        enclosing_method_parameter_size: factors[5],
        enclosing_method_parameters: factors[6],
        enclosing_method_super: factors[7],
    }
}
