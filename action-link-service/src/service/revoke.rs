use action_link_api::{ApiError, ApiResult, AuditAction, RequestMetadata, RevokeActionLinkResponse};
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::{Revoke, TransitionOutcome};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{downstream, rejection_error, ActionLinkService};

impl ActionLinkService {
    /// Deactivates a link permanently. Only active links can be revoked.
    #[tracing::instrument(skip(self, metadata))]
    pub async fn revoke(
        &self,
        user_id: Uuid,
        link_id: Uuid,
        metadata: &RequestMetadata,
    ) -> ApiResult<RevokeActionLinkResponse> {
        let link = self.load_for_member(link_id, user_id).await?;

        let audit = AuditLogModel::for_action_link(
            link.tenant_id,
            link.id,
            AuditAction::ActionLinkRevoke,
            json!({ "previous_status": link.status, "use_count": link.use_count }),
        )
        .with_user_actor(user_id)
        .with_request_metadata(metadata);

        let now = Utc::now();
        let outcome = self
            .links
            .revoke(link.id, now, audit)
            .await
            .map_err(downstream("revoke action link"))?;

        match outcome {
            TransitionOutcome::Applied(revoked) => {
                tracing::info!("Action link revoked");
                Ok(RevokeActionLinkResponse {
                    id: revoked.id,
                    status: revoked.status,
                })
            }
            TransitionOutcome::Rejected(current) => Err(rejection_error(&current, now)),
            TransitionOutcome::NotFound => {
                Err(ApiError::NotFound(format!("action link {link_id}")))
            }
        }
    }
}
