mod audit;
mod consume;
mod issue;
mod revoke;
mod verify;

use action_link_api::ApiError;
use action_link_db::kv::KeyValueStore;
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::repository::{
    ActionLinkRepository, InvoiceRepository, Load, QuoteRepository, TenantMembershipRepository,
};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::captcha::CaptchaVerifier;
use crate::config::ServiceSettings;
use crate::effects::ActionEffects;
use crate::idempotency::IdempotencyStore;
use crate::rate_limit::FixedWindowLimiter;

/// Collaborators of [`ActionLinkService`], constructed by the caller.
pub struct ServiceDependencies {
    pub links: Arc<dyn ActionLinkRepository>,
    pub memberships: Arc<dyn TenantMembershipRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub kv: Arc<dyn KeyValueStore>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}

/// Issues, verifies, consumes and revokes action links.
///
/// Holds no per-request state; every shared value lives in the injected stores.
pub struct ActionLinkService {
    links: Arc<dyn ActionLinkRepository>,
    memberships: Arc<dyn TenantMembershipRepository>,
    captcha: Arc<dyn CaptchaVerifier>,
    limiter: FixedWindowLimiter,
    idempotency: IdempotencyStore,
    effects: ActionEffects,
    settings: ServiceSettings,
}

impl ActionLinkService {
    pub fn new(deps: ServiceDependencies, settings: ServiceSettings) -> Self {
        Self {
            links: deps.links,
            memberships: deps.memberships,
            captcha: deps.captcha,
            limiter: FixedWindowLimiter::new(deps.kv.clone()),
            idempotency: IdempotencyStore::new(deps.kv.clone(), settings.idempotency_ttl),
            effects: ActionEffects::new(deps.quotes, deps.invoices, deps.kv, settings.cache_ttl),
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    async fn ensure_member(&self, tenant_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let is_member = self
            .memberships
            .is_member(tenant_id, user_id)
            .await
            .map_err(downstream("tenant membership lookup"))?;
        if is_member {
            Ok(())
        } else {
            tracing::warn!(%tenant_id, %user_id, "Rejected request from non-member");
            Err(ApiError::Forbidden(tenant_id))
        }
    }

    /// Loads a link for a tenant endpoint, checking the caller's membership.
    async fn load_for_member(
        &self,
        link_id: Uuid,
        user_id: Uuid,
    ) -> Result<ActionLinkModel, ApiError> {
        let link = self
            .links
            .load(link_id)
            .await
            .map_err(downstream("load action link"))?
            .ok_or_else(|| ApiError::NotFound(format!("action link {link_id}")))?;
        self.ensure_member(link.tenant_id, user_id).await?;
        Ok(link)
    }
}

/// Maps a store failure to a generic 500, logging the cause.
pub(crate) fn downstream(
    operation: &'static str,
) -> impl Fn(Box<dyn Error + Send + Sync>) -> ApiError {
    move |e| {
        tracing::error!(operation, error = %e, "Downstream operation failed");
        ApiError::DownstreamFailure(operation.to_string())
    }
}

/// The error for a link whose guarded transition was refused.
///
/// The fresh row normally violates a usability rule; if it does not, another
/// request changed it concurrently and the use is treated as spent.
fn rejection_error(current: &ActionLinkModel, now: DateTime<Utc>) -> ApiError {
    match current.check_usable(now) {
        Err(rejection) => rejection.into(),
        Ok(()) => ApiError::LinkExhausted,
    }
}
