/// Result of a conditional state transition on a stored entity.
///
/// Transitions re-check their preconditions against the row as it is when the
/// write happens, so a caller holding a stale copy learns the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome<T> {
    /// The transition was written; carries the entity after the change
    Applied(T),
    /// The preconditions no longer held; carries the entity as currently stored
    Rejected(T),
    /// No entity with that ID exists
    NotFound,
}

impl<T> TransitionOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}
