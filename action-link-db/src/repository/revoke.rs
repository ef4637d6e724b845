use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::action_link::ActionLinkModel;
use crate::models::audit::AuditLogModel;
use crate::repository::transition::TransitionOutcome;

/// Moves an active action link to `revoked`
///
/// Consumed or already revoked links are returned as `Rejected`.
#[async_trait]
pub trait Revoke: Send + Sync {
    async fn revoke(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
    ) -> Result<TransitionOutcome<ActionLinkModel>, Box<dyn std::error::Error + Send + Sync>>;
}
