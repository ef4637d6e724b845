use action_link_db::kv::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Read-through cache of JSON-encoded entities keyed by id.
///
/// The cache is never the source of truth: store errors and undecodable entries
/// fall through to the loader, and writers call [`ReadThroughCache::invalidate`].
/// Absent entities are not cached.
pub struct ReadThroughCache<T> {
    store: Arc<dyn KeyValueStore>,
    prefix: &'static str,
    ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T> ReadThroughCache<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: &'static str, ttl: Duration) -> Self {
        Self {
            store,
            prefix,
            ttl,
            _entity: PhantomData,
        }
    }

    pub fn key(&self, id: Uuid) -> String {
        format!("{}:{}", self.prefix, id)
    }

    pub async fn get_or_load<F, Fut>(
        &self,
        id: Uuid,
        load: F,
    ) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>>,
    {
        let key = self.key(id);

        match self.store.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<T>(&cached) {
                Ok(entity) => return Ok(Some(entity)),
                Err(e) => tracing::warn!(key, error = %e, "Discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(key, error = %e, "Cache read failed, loading from source"),
        }

        let loaded = load().await?;
        if let Some(entity) = &loaded {
            match serde_json::to_string(entity) {
                Ok(encoded) => {
                    if let Err(e) = self.store.set(&key, encoded, self.ttl).await {
                        tracing::warn!(key, error = %e, "Cache write failed");
                    }
                }
                Err(e) => tracing::warn!(key, error = %e, "Failed to encode cache entry"),
            }
        }
        Ok(loaded)
    }

    pub async fn invalidate(&self, id: Uuid) {
        let key = self.key(id);
        if let Err(e) = self.store.delete(&key).await {
            tracing::warn!(key, error = %e, "Cache invalidation failed");
        }
    }
}
