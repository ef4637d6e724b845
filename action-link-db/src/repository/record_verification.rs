use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::action_link::ActionLinkModel;
use crate::models::audit::AuditLogModel;
use crate::repository::transition::TransitionOutcome;

/// Records a successful verification of an action link
///
/// Sets `last_verified_at` and appends the verification audit entry in one
/// transaction. `use_count` is left untouched.
#[async_trait]
pub trait RecordVerification: Send + Sync {
    /// # Arguments
    /// * `id` - The link being verified
    /// * `now` - Verification time; the link must still be usable at this instant
    /// * `audit` - The verification audit entry, not yet chained
    ///
    /// # Returns
    /// * `Ok(Applied)` - The link after the update
    /// * `Ok(Rejected)` - The link became unusable since it was read
    /// * `Ok(NotFound)` - No link has this ID
    async fn record_verification(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
    ) -> Result<TransitionOutcome<ActionLinkModel>, Box<dyn std::error::Error + Send + Sync>>;
}
