use action_link_api::ActionLinkStatus;
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::revoke::Revoke;
use action_link_db::repository::transition::TransitionOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ActionLinkRepositoryImpl;

#[async_trait]
impl Revoke for ActionLinkRepositoryImpl {
    async fn revoke(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
    ) -> Result<TransitionOutcome<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        Self::transition_impl(
            self,
            id,
            now,
            audit,
            |link, _| link.status == ActionLinkStatus::Active,
            ActionLinkModel::apply_revocation,
        )
        .await
    }
}
