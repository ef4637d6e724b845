use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "audit_entity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    ActionLink,
}

impl From<AuditEntityType> for &str {
    fn from(val: AuditEntityType) -> Self {
        match val {
            AuditEntityType::ActionLink => "action_link",
        }
    }
}
