use action_link_api::ApiError;
use action_link_db::kv::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// At most `max_requests` per fixed `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimit {
    pub max_requests: u64,
    pub window: Duration,
}

impl WindowLimit {
    pub const fn new(max_requests: u64, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateDecision {
    /// Converts a rejection into the error returned to the caller.
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            RateDecision::Allowed => Ok(()),
            RateDecision::Limited { retry_after } => Err(ApiError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            }),
        }
    }
}

/// Fixed-window request counter over the shared key-value store.
///
/// Store failures let the request through.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    store: Arc<dyn KeyValueStore>,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self, key: &str, limit: WindowLimit) -> RateDecision {
        match self.store.increment(key, limit.window).await {
            Ok(window) if window.count > limit.max_requests => {
                tracing::debug!(key, count = window.count, "Rate limit exceeded");
                // Round up so a client that waits exactly Retry-After lands in the next window
                let retry_after = if window.resets_in.subsec_nanos() > 0 {
                    Duration::from_secs(window.resets_in.as_secs() + 1)
                } else {
                    window.resets_in
                };
                RateDecision::Limited { retry_after }
            }
            Ok(_) => RateDecision::Allowed,
            Err(e) => {
                tracing::warn!(key, error = %e, "Rate limit store unavailable, allowing request");
                RateDecision::Allowed
            }
        }
    }
}

fn client_key(ip: Option<&str>) -> &str {
    ip.filter(|ip| !ip.is_empty()).unwrap_or("unknown")
}

pub fn verify_ip_key(ip: Option<&str>) -> String {
    format!("rl:verify:ip:{}", client_key(ip))
}

pub fn verify_token_key(token_hash: &str) -> String {
    format!("rl:verify:token:{token_hash}")
}

pub fn consume_ip_key(ip: Option<&str>) -> String {
    format!("rl:consume:ip:{}", client_key(ip))
}
