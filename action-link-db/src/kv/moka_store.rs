use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

use super::{KeyValueStore, WindowCount};

#[derive(Debug, Clone)]
enum KvValue {
    Text(String),
    Counter(u64),
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: KvValue,
    expires_at: Instant,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Evicts each entry at its own `expires_at`.
struct PerEntryExpiry;

impl Expiry<String, StoredValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(value.expires_at.saturating_duration_since(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.expires_at.saturating_duration_since(updated_at))
    }
}

/// In-process [`KeyValueStore`] backed by a moka cache.
///
/// State is local to one process, so limits and idempotency records are per
/// instance when the service is scaled out.
#[derive(Clone)]
pub struct MokaKeyValueStore {
    cache: Cache<String, StoredValue>,
}

impl MokaKeyValueStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();
        Self { cache }
    }
}

impl Default for MokaKeyValueStore {
    fn default() -> Self {
        Self::new(100_000)
    }
}

#[async_trait]
impl KeyValueStore for MokaKeyValueStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let now = Instant::now();
        let value = self
            .cache
            .get(key)
            .await
            .filter(|stored| stored.is_live(now))
            .and_then(|stored| match stored.value {
                KvValue::Text(text) => Some(text),
                KvValue::Counter(count) => Some(count.to_string()),
            });
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stored = StoredValue {
            value: KvValue::Text(value),
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut inserted = false;
        self.cache
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let now = Instant::now();
                let stored = match existing.map(|entry| entry.into_value()) {
                    Some(current) if current.is_live(now) => current,
                    _ => {
                        inserted = true;
                        StoredValue {
                            value: KvValue::Text(value),
                            expires_at: now + ttl,
                        }
                    }
                };
                std::future::ready(stored)
            })
            .await;
        Ok(inserted)
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn increment(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, Box<dyn std::error::Error + Send + Sync>> {
        let entry = self
            .cache
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let now = Instant::now();
                let stored = match existing.map(|entry| entry.into_value()) {
                    Some(StoredValue {
                        value: KvValue::Counter(count),
                        expires_at,
                    }) if expires_at > now => StoredValue {
                        value: KvValue::Counter(count.saturating_add(1)),
                        expires_at,
                    },
                    _ => StoredValue {
                        value: KvValue::Counter(1),
                        expires_at: now + window,
                    },
                };
                std::future::ready(stored)
            })
            .await;

        let stored = entry.into_value();
        let count = match stored.value {
            KvValue::Counter(count) => count,
            KvValue::Text(_) => 1,
        };
        Ok(WindowCount {
            count,
            resets_in: stored.expires_at.saturating_duration_since(Instant::now()),
        })
    }
}
