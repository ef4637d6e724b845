use action_link_api::{
    normalize_email, validate_idempotency_key, ApiError, ApiResult, AuditAction,
    ConsumeActionLinkRequest, ConsumeResult, RequestMetadata,
};
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::{ConsumeOutcome, ConsumeUse, FindByTokenHash};
use action_link_db::utils::hash_token;
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::{downstream, rejection_error, ActionLinkService};
use crate::effects::target_unavailable;
use crate::idempotency::{IdempotencyStore, Reservation};
use crate::rate_limit::consume_ip_key;

impl ActionLinkService {
    /// Spends one use of a link and performs its action.
    ///
    /// At most once per idempotency key: a completed request with the same key is
    /// replayed with `idempotent` set, one still running yields `IdempotencyConflict`.
    #[tracing::instrument(skip_all, fields(link_id = tracing::field::Empty))]
    pub async fn consume(
        &self,
        request: ConsumeActionLinkRequest,
        idempotency_key: Option<&str>,
        metadata: &RequestMetadata,
    ) -> ApiResult<ConsumeResult> {
        request.validate()?;
        let idempotency_key = idempotency_key.ok_or_else(|| {
            ApiError::ValidationError("Idempotency-Key header is required".to_string())
        })?;
        validate_idempotency_key(idempotency_key)
            .map_err(|_| {
                ApiError::ValidationError("Idempotency-Key header is malformed".to_string())
            })?;

        let token_hash = hash_token(&request.token);
        let key = IdempotencyStore::consume_key(&token_hash, idempotency_key);

        match self.idempotency.begin(&key).await? {
            Reservation::Acquired => {}
            Reservation::Completed(prior) => {
                tracing::info!("Replaying completed consumption");
                return Ok(ConsumeResult {
                    idempotent: true,
                    ..prior
                });
            }
            Reservation::InFlight => return Err(ApiError::IdempotencyConflict),
        }

        match self.consume_reserved(&request, &token_hash, metadata).await {
            Ok(result) => {
                self.idempotency.complete(&key, &result).await;
                Ok(result)
            }
            Err(e) => {
                self.idempotency.abandon(&key).await;
                Err(e)
            }
        }
    }

    async fn consume_reserved(
        &self,
        request: &ConsumeActionLinkRequest,
        token_hash: &str,
        metadata: &RequestMetadata,
    ) -> ApiResult<ConsumeResult> {
        self.limiter
            .check(
                &consume_ip_key(metadata.ip_address.as_deref()),
                self.settings.consume_ip_limit,
            )
            .await
            .into_result()?;

        let link = self
            .links
            .find_by_token_hash(token_hash)
            .await
            .map_err(downstream("find action link"))?
            .ok_or(ApiError::LinkInvalid)?;
        tracing::Span::current().record("link_id", tracing::field::display(link.id));

        let now = Utc::now();
        link.check_usable(now)?;
        if !link.email_matches(&request.email) {
            tracing::debug!("Consumption email mismatch");
            return Err(ApiError::EmailMismatch);
        }

        let email = normalize_email(&request.email);
        let target = self.effects.prepare(&link, &email).await?;

        let audit = AuditLogModel::for_action_link(
            link.tenant_id,
            link.id,
            AuditAction::ActionLinkConsume,
            json!({
                "action_type": link.action_type,
                "payload": request.payload,
            }),
        )
        .with_email_actor(&email)
        .with_request_metadata(metadata);

        let outcome = self
            .links
            .consume_use(link.id, now, audit, &target)
            .await
            .map_err(downstream("consume action link"))?;

        let consumed = match outcome {
            ConsumeOutcome::Consumed(consumed) => consumed,
            ConsumeOutcome::Rejected(current) => {
                tracing::info!("Consumption lost a race for the last use");
                return Err(rejection_error(&current, now));
            }
            ConsumeOutcome::TargetUnavailable => {
                tracing::warn!("Target changed before the consumption was written");
                self.effects.invalidate(&target).await;
                return Err(target_unavailable(&target));
            }
            ConsumeOutcome::NotFound => return Err(ApiError::LinkInvalid),
        };
        self.effects.invalidate(&target).await;

        tracing::info!(
            action_type = %consumed.action_type,
            use_count = consumed.use_count,
            max_uses = consumed.max_uses,
            "Action link consumed"
        );

        Ok(ConsumeResult {
            consumed: consumed.is_fully_consumed(),
            idempotent: false,
        })
    }
}
