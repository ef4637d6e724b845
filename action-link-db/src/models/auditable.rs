use uuid::Uuid;

use super::identifiable::Identifiable;

/// Trait for entities whose audit entries form a hash chain.
///
/// The entity row carries the head of its chain so the next audit entry can
/// reference it as antecedent.
pub trait Auditable: Identifiable {
    /// Returns the ID of the last audit log entry for this entity, if any
    fn get_last_audit_log_id(&self) -> Option<Uuid>;

    /// Returns the hash of the last audit log entry for this entity (0 if none)
    fn get_last_audit_hash(&self) -> i64;
}
