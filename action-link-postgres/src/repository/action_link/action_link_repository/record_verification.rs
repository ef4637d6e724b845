use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::record_verification::RecordVerification;
use action_link_db::repository::transition::TransitionOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ActionLinkRepositoryImpl;

#[async_trait]
impl RecordVerification for ActionLinkRepositoryImpl {
    async fn record_verification(
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
            |link, now| link.check_usable(now).is_ok(),
            ActionLinkModel::apply_verification,
        )
        .await
    }
}
