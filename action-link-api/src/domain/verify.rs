use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::action_type::ActionType;
use super::validation::validate_action_token;

/// Body of `POST /action-links/verify`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyActionLinkRequest {
    #[validate(custom(function = "validate_action_token"))]
    pub token: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(rename = "captchaToken", alias = "captcha_token")]
    #[validate(length(min = 1, max = 2048))]
    pub captcha_token: String,
}

/// What a token holder learns about a link after successful verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedActionLink {
    pub id: Uuid,
    pub action_type: ActionType,
    pub tenant_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyActionLinkResponse {
    pub ok: bool,
    pub data: VerifiedActionLink,
}
