use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy of the action link service.
///
/// Every variant has a stable wire code ([`ApiError::code`]) and an HTTP status
/// ([`ApiError::status_code`]). Business-rule rejections are not retryable without
/// a new link; rate limits, idempotency conflicts and downstream failures are.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not a member of tenant {0}")]
    Forbidden(Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Captcha verification failed")]
    CaptchaFailed,

    #[error("Invalid or missing link")]
    LinkInvalid,

    #[error("Link is no longer active")]
    LinkInactive,

    #[error("Link has expired")]
    LinkExpired,

    #[error("Link has no remaining uses")]
    LinkExhausted,

    #[error("Email does not match the link")]
    EmailMismatch,

    #[error("Action target unavailable: {0}")]
    TargetUnavailable(String),

    #[error("A request with this idempotency key is still in progress")]
    IdempotencyConflict,

    #[error("Downstream failure: {0}")]
    DownstreamFailure(String),
}

impl ApiError {
    /// Stable machine-readable code returned in the `error` field of responses.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "invalid_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::CaptchaFailed => "captcha_failed",
            ApiError::LinkInvalid => "invalid_or_missing_link",
            ApiError::LinkInactive => "link_inactive",
            ApiError::LinkExpired => "link_expired",
            ApiError::LinkExhausted => "link_exhausted",
            ApiError::EmailMismatch => "email_mismatch",
            ApiError::TargetUnavailable(_) => "target_unavailable",
            ApiError::IdempotencyConflict => "idempotency_conflict",
            ApiError::DownstreamFailure(_) => "downstream_failure",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::IdempotencyConflict => 409,
            ApiError::RateLimited { .. } => 429,
            ApiError::DownstreamFailure(_) => 500,
            _ => 400,
        }
    }

    /// Whether the caller may retry the same request later and expect a different outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited { .. }
                | ApiError::IdempotencyConflict
                | ApiError::DownstreamFailure(_)
        )
    }

    /// Human-readable detail safe to return to clients.
    ///
    /// Downstream failures deliberately carry none; their cause is only logged.
    pub fn public_detail(&self) -> Option<String> {
        match self {
            ApiError::ValidationError(msg) | ApiError::TargetUnavailable(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(format!("[{errors}]").replace('\n', ", "))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rejections_are_bad_requests() {
        for error in [
            ApiError::LinkInvalid,
            ApiError::LinkInactive,
            ApiError::LinkExpired,
            ApiError::LinkExhausted,
            ApiError::EmailMismatch,
            ApiError::CaptchaFailed,
        ] {
            assert_eq!(error.status_code(), 400, "{error}");
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        let error = ApiError::RateLimited { retry_after_secs: 30 };
        assert_eq!(error.code(), "rate_limited");
        assert_eq!(error.status_code(), 429);
        assert!(error.is_retryable());
    }

    #[test]
    fn test_downstream_failure_hides_detail() {
        let error = ApiError::DownstreamFailure("connection refused".to_string());
        assert_eq!(error.status_code(), 500);
        assert_eq!(error.public_detail(), None);
    }
}
