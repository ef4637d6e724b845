use action_link_api::{normalize_email, ActionLinkStatus, ActionType, ApiError};
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::AuditLogModel;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;

/// # Documentation
/// A capability grant letting the holder of a raw token perform one kind of action
/// on behalf of a tenant.
///
/// - The raw token is never stored. `token_hash` is its BLAKE3 digest and the only
///   lookup key for anonymous callers.
/// - `use_count` never exceeds `max_uses`; reaching it moves `status` to `Consumed`.
/// - Expiry is evaluated at read time and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLinkModel {
    pub id: Uuid,

    pub tenant_id: Uuid,

    pub token_hash: HeaplessString<64>,

    /// Authorized address, stored normalized (trimmed, lower-case)
    pub email: HeaplessString<254>,

    pub action_type: ActionType,

    /// JSON object; `target_id` names the record for quote and invoice links
    pub metadata: serde_json::Value,

    pub expires_at: DateTime<Utc>,

    pub max_uses: i32,

    pub use_count: i32,

    pub status: ActionLinkStatus,

    pub created_by_user_id: Uuid,

    pub created_at: DateTime<Utc>,

    pub last_verified_at: Option<DateTime<Utc>>,

    pub consumed_at: Option<DateTime<Utc>>,

    pub revoked_at: Option<DateTime<Utc>>,

    /// Head of the audit hash chain
    /// - None: for new links not yet created
    /// - Some(uuid): the latest audit entry written for this link
    pub last_audit_log_id: Option<Uuid>,

    /// Hash of the audit entry referenced by `last_audit_log_id` (0 for new links)
    pub last_audit_hash: i64,
}

/// Why a stored link cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRejection {
    Inactive,
    Expired,
    Exhausted,
}

impl From<LinkRejection> for ApiError {
    fn from(rejection: LinkRejection) -> Self {
        match rejection {
            LinkRejection::Inactive => ApiError::LinkInactive,
            LinkRejection::Expired => ApiError::LinkExpired,
            LinkRejection::Exhausted => ApiError::LinkExhausted,
        }
    }
}

impl ActionLinkModel {
    /// Checks status, then expiry, then the use-count bound.
    ///
    /// A consumed link reports `Exhausted` rather than `Inactive`: it became
    /// unusable by running out of uses.
    pub fn check_usable(&self, now: DateTime<Utc>) -> Result<(), LinkRejection> {
        match self.status {
            ActionLinkStatus::Revoked => return Err(LinkRejection::Inactive),
            ActionLinkStatus::Consumed => return Err(LinkRejection::Exhausted),
            ActionLinkStatus::Active => {}
        }

        if now >= self.expires_at {
            return Err(LinkRejection::Expired);
        }

        if self.use_count >= self.max_uses {
            return Err(LinkRejection::Exhausted);
        }

        Ok(())
    }

    /// Case-insensitive comparison against the authorized address.
    pub fn email_matches(&self, claimed: &str) -> bool {
        normalize_email(claimed) == normalize_email(self.email.as_str())
    }

    pub fn is_fully_consumed(&self) -> bool {
        self.status == ActionLinkStatus::Consumed
    }

    /// Records one use, moving to `Consumed` when the bound is reached.
    pub fn apply_use(&mut self, now: DateTime<Utc>) {
        self.use_count += 1;
        if self.use_count >= self.max_uses {
            self.status = ActionLinkStatus::Consumed;
            self.consumed_at = Some(now);
        }
    }

    pub fn apply_verification(&mut self, now: DateTime<Utc>) {
        self.last_verified_at = Some(now);
    }

    pub fn apply_revocation(&mut self, now: DateTime<Utc>) {
        self.status = ActionLinkStatus::Revoked;
        self.revoked_at = Some(now);
    }

    /// Moves the chain head to `audit`, which must already be sealed.
    pub fn attach_audit(&mut self, audit: &AuditLogModel) {
        self.last_audit_log_id = Some(audit.id);
        self.last_audit_hash = audit.hash;
    }
}

impl Identifiable for ActionLinkModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ActionLinkModel {
    fn get_last_audit_log_id(&self) -> Option<Uuid> {
        self.last_audit_log_id
    }

    fn get_last_audit_hash(&self) -> i64 {
        self.last_audit_hash
    }
}
