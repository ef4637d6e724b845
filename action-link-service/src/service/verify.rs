use action_link_api::{
    normalize_email, ApiError, ApiResult, AuditAction, RequestMetadata, VerifiedActionLink,
    VerifyActionLinkRequest,
};
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::{FindByTokenHash, RecordVerification, TransitionOutcome};
use action_link_db::utils::hash_token;
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::{downstream, rejection_error, ActionLinkService};
use crate::rate_limit::{verify_ip_key, verify_token_key};

impl ActionLinkService {
    /// Checks that a token holder may act on a link, without spending a use.
    ///
    /// Rate limits and the CAPTCHA run before the database is touched.
    #[tracing::instrument(skip_all, fields(link_id = tracing::field::Empty))]
    pub async fn verify(
        &self,
        request: VerifyActionLinkRequest,
        metadata: &RequestMetadata,
    ) -> ApiResult<VerifiedActionLink> {
        request.validate()?;
        let token_hash = hash_token(&request.token);
        let client_ip = metadata.ip_address.as_deref();

        self.limiter
            .check(&verify_ip_key(client_ip), self.settings.verify_ip_limit)
            .await
            .into_result()?;
        self.limiter
            .check(&verify_token_key(&token_hash), self.settings.verify_token_limit)
            .await
            .into_result()?;

        match self.captcha.verify(&request.captcha_token, client_ip).await {
            Ok(true) => {}
            Ok(false) => return Err(ApiError::CaptchaFailed),
            Err(e) => {
                tracing::error!(error = %e, "Captcha verifier unavailable");
                return Err(ApiError::DownstreamFailure("captcha verifier".to_string()));
            }
        }

        let link = self
            .links
            .find_by_token_hash(&token_hash)
            .await
            .map_err(downstream("find action link"))?
            .ok_or(ApiError::LinkInvalid)?;
        tracing::Span::current().record("link_id", tracing::field::display(link.id));

        let now = Utc::now();
        link.check_usable(now)?;
        if !link.email_matches(&request.email) {
            tracing::debug!("Verification email mismatch");
            return Err(ApiError::EmailMismatch);
        }

        let audit = AuditLogModel::for_action_link(
            link.tenant_id,
            link.id,
            AuditAction::ActionLinkVerify,
            json!({ "action_type": link.action_type }),
        )
        .with_email_actor(&normalize_email(&request.email))
        .with_request_metadata(metadata);

        let outcome = self
            .links
            .record_verification(link.id, now, audit)
            .await
            .map_err(downstream("record verification"))?;

        match outcome {
            TransitionOutcome::Applied(verified) => {
                tracing::info!(action_type = %verified.action_type, "Action link verified");
                Ok(VerifiedActionLink {
                    id: verified.id,
                    action_type: verified.action_type,
                    tenant_id: verified.tenant_id,
                    expires_at: verified.expires_at,
                    metadata: verified.metadata,
                })
            }
            TransitionOutcome::Rejected(current) => Err(rejection_error(&current, now)),
            TransitionOutcome::NotFound => Err(ApiError::LinkInvalid),
        }
    }
}
