use async_trait::async_trait;
use uuid::Uuid;

use crate::models::audit::AuditLogModel;
use crate::repository::pagination::{Page, PageRequest};

/// Repository trait for loading the audit trail of an entity with pagination
///
/// Entries are returned oldest first, so consecutive entries of a page can be
/// checked against each other with `AuditLogModel::verify_chain`.
///
/// # Example
/// ```ignore
/// let page = repo.load_audits(link_id, PageRequest::new(50, 0)).await?;
/// let intact = AuditLogModel::verify_chain(&page.items, page.offset == 0);
/// ```
#[async_trait]
pub trait LoadAudits: Send + Sync {
    /// # Arguments
    /// * `entity_id` - The entity whose audit entries should be loaded
    /// * `page` - The pagination parameters (limit and offset)
    ///
    /// # Returns
    /// * `Ok(Page<AuditLogModel>)` - A page of entries and the total count
    /// * `Err` - An error if the audit records could not be loaded
    async fn load_audits(
        &self,
        entity_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>>;
}
