pub mod moka_store;

pub use moka_store::*;

use async_trait::async_trait;
use std::time::Duration;

/// Fixed-window counter state returned by [`KeyValueStore::increment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Number of increments in the current window, including this one
    pub count: u64,
    /// Time until the window closes and the counter restarts
    pub resets_in: Duration,
}

/// Expiring key-value storage shared by rate limiting, idempotency and caching.
///
/// Every write carries a TTL; expired keys behave as absent. Each operation is
/// atomic per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Store `value`, replacing any previous value and TTL
    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Store `value` only if `key` is absent
    ///
    /// # Returns
    /// * `Ok(true)` - This call stored the value
    /// * `Ok(false)` - A live value already existed and was left in place
    async fn set_if_absent(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Increment the counter at `key`
    ///
    /// The first increment opens a window of length `window`; later increments
    /// within it do not extend it.
    async fn increment(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, Box<dyn std::error::Error + Send + Sync>>;
}
