use serde::{Deserialize, Serialize};

/// Kind of action an action link authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "action_type", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Quote,
    Invoice,
    Other,
}

impl ActionType {
    /// Whether links of this type act on a concrete record named by `metadata.target_id`.
    pub fn requires_target(&self) -> bool {
        matches!(self, ActionType::Quote | ActionType::Invoice)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Quote => write!(f, "quote"),
            ActionType::Invoice => write!(f, "invoice"),
            ActionType::Other => write!(f, "other"),
        }
    }
}

/// Stored lifecycle state of an action link.
///
/// `Active` is the only state from which a link can be used. `Consumed` and
/// `Revoked` are terminal. Expiry is not a stored state; it is evaluated at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "action_link_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ActionLinkStatus {
    Active,
    Consumed,
    Revoked,
}

impl std::fmt::Display for ActionLinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionLinkStatus::Active => write!(f, "active"),
            ActionLinkStatus::Consumed => write!(f, "consumed"),
            ActionLinkStatus::Revoked => write!(f, "revoked"),
        }
    }
}
