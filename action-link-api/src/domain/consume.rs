use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::validate_action_token;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Body of `POST /action-links/consume`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConsumeActionLinkRequest {
    #[validate(custom(function = "validate_action_token"))]
    pub token: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Outcome of a consumption, as stored for idempotent replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResult {
    /// Whether the link has no uses left after this consumption.
    pub consumed: bool,
    /// Set when the result is a replay of an earlier request with the same key.
    #[serde(default)]
    pub idempotent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumeActionLinkResponse {
    pub ok: bool,
    pub consumed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub idempotent: bool,
}

impl From<ConsumeResult> for ConsumeActionLinkResponse {
    fn from(result: ConsumeResult) -> Self {
        Self {
            ok: true,
            consumed: result.consumed,
            idempotent: result.idempotent,
        }
    }
}
