use action_link_api::{AuditAction, AuditEntryView, RequestMetadata};
use chrono::{DateTime, SubsecRound, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit_entity_type::AuditEntityType;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::{canonical_json, hash_as_i64, truncate_to_heapless};

const MAX_USER_AGENT_CHARS: usize = 512;

/// # Documentation
/// - Append-only record of one state-changing event on an auditable entity.
/// - Written in the same transaction as the change it records; never updated or deleted.
/// - Entries of one entity form a hash chain:
///   - `hash`: hash of the entry itself, computed with this field set to 0
///   - `antecedent_hash`: hash of the previous entry of the same entity (0 for the first)
///   - `antecedent_audit_log_id`: ID of that previous entry (`Uuid::nil()` for the first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogModel {
    pub id: Uuid,

    pub tenant_id: Uuid,

    pub action: AuditAction,

    pub entity_type: AuditEntityType,

    pub entity_id: Uuid,

    /// Set when a tenant user performed the action
    pub actor_user_id: Option<Uuid>,

    /// Set when a token holder performed the action
    pub actor_email: Option<HeaplessString<254>>,

    pub ip_address: Option<HeaplessString<64>>,

    pub user_agent: Option<String>,

    pub details: serde_json::Value,

    /// Truncated to microseconds so the value survives a PostgreSQL round trip unchanged
    pub created_at: DateTime<Utc>,

    pub antecedent_hash: i64,

    pub antecedent_audit_log_id: Uuid,

    pub hash: i64,
}

/// Fields covered by an audit entry's hash.
#[derive(Serialize)]
struct AuditHashInput<'a> {
    id: Uuid,
    tenant_id: Uuid,
    action: &'a str,
    entity_type: &'a str,
    entity_id: Uuid,
    actor_user_id: Option<Uuid>,
    actor_email: Option<&'a str>,
    ip_address: Option<&'a str>,
    user_agent: Option<&'a str>,
    details: String,
    created_at: i64,
    antecedent_hash: i64,
    antecedent_audit_log_id: Uuid,
}

impl AuditLogModel {
    /// Creates an unsealed entry for an action link event.
    pub fn for_action_link(
        tenant_id: Uuid,
        link_id: Uuid,
        action: AuditAction,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            action,
            entity_type: AuditEntityType::ActionLink,
            entity_id: link_id,
            actor_user_id: None,
            actor_email: None,
            ip_address: None,
            user_agent: None,
            details,
            created_at: Utc::now().trunc_subsecs(6),
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
        }
    }

    pub fn with_user_actor(mut self, user_id: Uuid) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_email_actor(mut self, email: &str) -> Self {
        self.actor_email = Some(truncate_to_heapless(email));
        self
    }

    pub fn with_request_metadata(mut self, metadata: &RequestMetadata) -> Self {
        self.ip_address = metadata.ip_address.as_deref().map(truncate_to_heapless);
        self.user_agent = metadata
            .user_agent
            .as_deref()
            .map(|ua| ua.chars().take(MAX_USER_AGENT_CHARS).collect());
        self
    }

    /// Links this entry after the entity's current chain head and computes its hash.
    pub fn chained_after<T: Auditable>(mut self, entity: &T) -> Result<Self, String> {
        self.antecedent_audit_log_id = entity.get_last_audit_log_id().unwrap_or(Uuid::nil());
        self.antecedent_hash = entity.get_last_audit_hash();
        self.hash = 0;
        self.hash = self.compute_hash()?;
        Ok(self)
    }

    /// Hash of the entry as if `hash` were 0.
    pub fn compute_hash(&self) -> Result<i64, String> {
        let input = AuditHashInput {
            id: self.id,
            tenant_id: self.tenant_id,
            action: self.action.into(),
            entity_type: self.entity_type.into(),
            entity_id: self.entity_id,
            actor_user_id: self.actor_user_id,
            actor_email: self.actor_email.as_deref(),
            ip_address: self.ip_address.as_deref(),
            user_agent: self.user_agent.as_deref(),
            details: canonical_json(&self.details),
            created_at: self.created_at.timestamp_micros(),
            antecedent_hash: self.antecedent_hash,
            antecedent_audit_log_id: self.antecedent_audit_log_id,
        };
        hash_as_i64(&input)
    }

    /// Verifies that `entries` (oldest first) are intact and chained to each other.
    ///
    /// When `from_genesis` is true the first entry must also be the first of its chain.
    pub fn verify_chain(entries: &[AuditLogModel], from_genesis: bool) -> bool {
        let mut previous: Option<&AuditLogModel> = None;
        for entry in entries {
            match entry.compute_hash() {
                Ok(hash) if hash == entry.hash => {}
                _ => return false,
            }

            let linked = match previous {
                Some(prev) => {
                    entry.antecedent_audit_log_id == prev.id && entry.antecedent_hash == prev.hash
                }
                None if from_genesis => {
                    entry.antecedent_audit_log_id.is_nil() && entry.antecedent_hash == 0
                }
                None => true,
            };
            if !linked {
                return false;
            }
            previous = Some(entry);
        }
        true
    }
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<AuditLogModel> for AuditEntryView {
    fn from(model: AuditLogModel) -> Self {
        AuditEntryView {
            id: model.id,
            action: model.action,
            actor_user_id: model.actor_user_id,
            actor_email: model.actor_email.map(|email| email.as_str().to_string()),
            ip_address: model.ip_address.map(|ip| ip.as_str().to_string()),
            user_agent: model.user_agent,
            details: model.details,
            created_at: model.created_at,
        }
    }
}
