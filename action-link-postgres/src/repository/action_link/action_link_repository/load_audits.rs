use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::load_audits::LoadAudits;
use action_link_db::repository::pagination::{Page, PageRequest};
use async_trait::async_trait;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ActionLinkRepositoryImpl;
use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;

#[async_trait]
impl LoadAudits for ActionLinkRepositoryImpl {
    async fn load_audits(
        &self,
        entity_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<AuditLogModel>, Box<dyn Error + Send + Sync>> {
        AuditLogRepositoryImpl::load_audits_impl(&self.audit_log_repository, entity_id, page).await
    }
}
