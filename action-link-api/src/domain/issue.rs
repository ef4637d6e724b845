use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::action_type::ActionType;
use crate::error::ApiError;

pub const DEFAULT_EXPIRES_IN_MINUTES: u32 = 60;
pub const MIN_EXPIRES_IN_MINUTES: u32 = 5;
pub const MAX_EXPIRES_IN_MINUTES: u32 = 30 * 24 * 60;
pub const DEFAULT_MAX_USES: u32 = 1;
pub const MAX_MAX_USES: u32 = 100;

/// Metadata key naming the record a `quote` or `invoice` link acts on.
pub const TARGET_ID_KEY: &str = "target_id";

/// Body of `POST /action-links`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IssueActionLinkRequest {
    pub tenant_id: Uuid,

    pub action_type: ActionType,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[validate(range(min = MIN_EXPIRES_IN_MINUTES, max = MAX_EXPIRES_IN_MINUTES))]
    pub expires_in_minutes: Option<u32>,

    #[validate(range(min = 1, max = MAX_MAX_USES))]
    pub max_uses: Option<u32>,
}

impl IssueActionLinkRequest {
    pub fn expires_in(&self) -> chrono::Duration {
        let minutes = self.expires_in_minutes.unwrap_or(DEFAULT_EXPIRES_IN_MINUTES);
        chrono::Duration::minutes(i64::from(minutes))
    }

    pub fn max_uses(&self) -> u32 {
        self.max_uses.unwrap_or(DEFAULT_MAX_USES)
    }

    /// Returns the metadata to persist, checking it against the action type.
    ///
    /// Metadata must be a JSON object. `quote` and `invoice` links must name their
    /// target record with a UUID under `target_id`.
    pub fn checked_metadata(&self) -> Result<serde_json::Value, ApiError> {
        let metadata = match &self.metadata {
            None | Some(serde_json::Value::Null) => serde_json::Value::Object(Default::default()),
            Some(value @ serde_json::Value::Object(_)) => value.clone(),
            Some(_) => {
                return Err(ApiError::ValidationError(
                    "metadata must be a JSON object".to_string(),
                ))
            }
        };

        if self.action_type.requires_target() && target_id(&metadata).is_none() {
            return Err(ApiError::ValidationError(format!(
                "metadata.{TARGET_ID_KEY} must be a UUID for {} links",
                self.action_type
            )));
        }

        Ok(metadata)
    }
}

/// Extracts the target record id from link metadata.
pub fn target_id(metadata: &serde_json::Value) -> Option<Uuid> {
    metadata
        .get(TARGET_ID_KEY)
        .and_then(|value| value.as_str())
        .and_then(|value| Uuid::parse_str(value).ok())
}

/// Response of `POST /action-links`.
///
/// `link` embeds the raw token. It is returned exactly once and cannot be recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueActionLinkResponse {
    pub id: Uuid,
    pub link: String,
    pub expires_at: DateTime<Utc>,
}

/// Response of `POST /action-links/{id}/revoke`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeActionLinkResponse {
    pub id: Uuid,
    pub status: super::action_type::ActionLinkStatus,
}
