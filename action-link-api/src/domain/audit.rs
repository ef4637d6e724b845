use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "audit_action"))]
pub enum AuditAction {
    #[serde(rename = "action_link.create")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "action_link.create"))]
    ActionLinkCreate,

    #[serde(rename = "action_link.verify")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "action_link.verify"))]
    ActionLinkVerify,

    #[serde(rename = "action_link.consume")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "action_link.consume"))]
    ActionLinkConsume,

    #[serde(rename = "action_link.revoke")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "action_link.revoke"))]
    ActionLinkRevoke,
}

impl From<AuditAction> for &str {
    fn from(val: AuditAction) -> Self {
        match val {
            AuditAction::ActionLinkCreate => "action_link.create",
            AuditAction::ActionLinkVerify => "action_link.verify",
            AuditAction::ActionLinkConsume => "action_link.consume",
            AuditAction::ActionLinkRevoke => "action_link.revoke",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = (*self).into();
        f.write_str(name)
    }
}

/// One audit entry as returned to tenant members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntryView {
    pub id: Uuid,
    pub action: AuditAction,
    pub actor_user_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /action-links/{id}/audit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrailResponse {
    pub items: Vec<AuditEntryView>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    /// Whether the returned entries hash-chain correctly.
    pub chain_valid: bool,
}

/// Client details captured with every audit entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuditTrailQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
