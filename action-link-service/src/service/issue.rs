use action_link_api::{
    normalize_email, ActionLinkStatus, ApiError, ApiResult, AuditAction, IssueActionLinkRequest,
    IssueActionLinkResponse, RequestMetadata,
};
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::Create;
use chrono::{SubsecRound, Utc};
use heapless::String as HeaplessString;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{downstream, ActionLinkService};
use crate::token::{action_url, generate_token};

impl ActionLinkService {
    /// Creates a link for `request` on behalf of a tenant member.
    ///
    /// The returned URL carries the only copy of the raw token.
    #[tracing::instrument(
        skip(self, request, metadata),
        fields(
            tenant_id = %request.tenant_id,
            action_type = %request.action_type,
            link_id = tracing::field::Empty
        )
    )]
    pub async fn issue(
        &self,
        user_id: Uuid,
        request: IssueActionLinkRequest,
        metadata: &RequestMetadata,
    ) -> ApiResult<IssueActionLinkResponse> {
        request.validate()?;
        let link_metadata = request.checked_metadata()?;
        self.ensure_member(request.tenant_id, user_id).await?;

        let email = HeaplessString::try_from(normalize_email(&request.email).as_str())
            .map_err(|_| ApiError::ValidationError("email: too long".to_string()))?;
        let max_uses = i32::try_from(request.max_uses())
            .map_err(|_| ApiError::ValidationError("max_uses: out of range".to_string()))?;

        let token = generate_token();
        let now = Utc::now().trunc_subsecs(6);
        let link = ActionLinkModel {
            id: Uuid::new_v4(),
            tenant_id: request.tenant_id,
            token_hash: token.hash,
            email,
            action_type: request.action_type,
            metadata: link_metadata,
            expires_at: now + request.expires_in(),
            max_uses,
            use_count: 0,
            status: ActionLinkStatus::Active,
            created_by_user_id: user_id,
            created_at: now,
            last_verified_at: None,
            consumed_at: None,
            revoked_at: None,
            last_audit_log_id: None,
            last_audit_hash: 0,
        };
        tracing::Span::current().record("link_id", tracing::field::display(link.id));

        let audit = AuditLogModel::for_action_link(
            link.tenant_id,
            link.id,
            AuditAction::ActionLinkCreate,
            json!({
                "action_type": link.action_type,
                "max_uses": link.max_uses,
                "expires_at": link.expires_at,
            }),
        )
        .with_user_actor(user_id)
        .with_request_metadata(metadata);

        let link = self
            .links
            .create(link, audit)
            .await
            .map_err(downstream("create action link"))?;

        tracing::info!(
            expires_at = %link.expires_at,
            max_uses = link.max_uses,
            "Action link issued"
        );

        Ok(IssueActionLinkResponse {
            id: link.id,
            link: action_url(&self.settings.public_base_url, &token.raw),
            expires_at: link.expires_at,
        })
    }
}
