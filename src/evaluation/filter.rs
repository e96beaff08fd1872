//! Event filter: which recorded events are worth evaluating

use crate::event::{CompletionEvent, IdeEvent, TerminationState};

/// Why an event was not evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotCompletion,
    NotApplied,
    NoSelection,
    NotMethod,
}

/// Check a completion event, returning the accepted method identifier
///
/// Kept events were applied, have at least one selection, and their last
/// selected proposal names a method.
pub fn accepted_method(event: &CompletionEvent) -> Result<&str, Rejection> {
    if event.terminated_state != TerminationState::Applied {
        return Err(Rejection::NotApplied);
    }
    let proposal = event.last_selected_proposal().ok_or(Rejection::NoSelection)?;
    if !proposal.name.is_method() {
        return Err(Rejection::NotMethod);
    }
    Ok(&proposal.name.identifier)
}

/// Filter an arbitrary IDE event
pub fn filter_event(event: &IdeEvent) -> Result<(&CompletionEvent, &str), Rejection> {
    let ce = event.as_completion().ok_or(Rejection::NotCompletion)?;
    let method = accepted_method(ce)?;
    Ok((ce, method))
}
