use validator::ValidationError;

/// Length of a raw action token: 32 random bytes as unpadded URL-safe base64.
pub const ACTION_TOKEN_LENGTH: usize = 43;

pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 255;

pub fn validate_action_token(token: &str) -> Result<(), ValidationError> {
    if token.len() != ACTION_TOKEN_LENGTH {
        return Err(ValidationError::new("token_length"));
    }

    if !token
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(ValidationError::new("token_charset"));
    }

    Ok(())
}

pub fn validate_idempotency_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::new("idempotency_key_empty"));
    }

    if key.len() > MAX_IDEMPOTENCY_KEY_LENGTH {
        return Err(ValidationError::new("idempotency_key_too_long"));
    }

    // visible ASCII only; the key ends up inside a store key
    if !key.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ValidationError::new("idempotency_key_charset"));
    }

    Ok(())
}

/// Normalizes an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
