//! Selection matcher
//!
//! Correlates the developer's accepted method with the queries reconstructed
//! from the event context.

use crate::query::QuerySelection;

/// Index of the last query whose selection equals `selected`
///
/// Comparison is exact and case-sensitive. Positions without a selection never
/// match. The latest match wins because later queries were reconstructed with
/// more of the final context available.
pub fn find_match(query_selections: &[QuerySelection], selected: &str) -> Option<usize> {
    query_selections
        .iter()
        .rposition(|qs| qs.selection.as_deref() == Some(selected))
}
