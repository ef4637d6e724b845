use async_trait::async_trait;

use crate::models::audit::AuditLogModel;
use crate::models::identifiable::Identifiable;

/// Repository trait for persisting a new entity together with its first audit entry
///
/// The entity row and the audit entry are written in a single transaction: either
/// both become visible or neither does.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl Create<ActionLinkModel> for ActionLinkRepositoryImpl {
///     async fn create(
///         &self,
///         item: ActionLinkModel,
///         audit: AuditLogModel,
///     ) -> Result<ActionLinkModel, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait Create<T: Identifiable>: Send + Sync {
    /// Insert `item` and append `audit` to its audit chain
    ///
    /// # Arguments
    /// * `item` - The entity to create
    /// * `audit` - The creation audit entry, not yet chained
    ///
    /// # Returns
    /// * `Ok(T)` - The stored entity, with its audit chain head populated
    /// * `Err` - An error if the transaction could not be executed
    async fn create(
        &self,
        item: T,
        audit: AuditLogModel,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
