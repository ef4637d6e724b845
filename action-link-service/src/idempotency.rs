use action_link_api::{ApiError, ConsumeResult};
use action_link_db::kv::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

const PENDING_MARKER: &str = "pending";

/// State of an idempotency key after [`IdempotencyStore::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// This request owns the key and must `complete` or `abandon` it
    Acquired,
    /// An earlier request with this key finished; replay its result
    Completed(ConsumeResult),
    /// An earlier request with this key is still running
    InFlight,
}

/// Deduplicates retried consumption requests.
///
/// A key is reserved with a pending marker, replaced by the result on success and
/// deleted on failure. Store errors fail the request rather than risk running the
/// side effect twice.
#[derive(Clone)]
pub struct IdempotencyStore {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl IdempotencyStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn consume_key(token_hash: &str, idempotency_key: &str) -> String {
        format!("idem:consume:{token_hash}:{idempotency_key}")
    }

    pub async fn begin(&self, key: &str) -> Result<Reservation, ApiError> {
        // A completed record can expire between the two calls; one retry covers it
        for _ in 0..2 {
            let reserved = self
                .store
                .set_if_absent(key, PENDING_MARKER.to_string(), self.ttl)
                .await
                .map_err(unavailable)?;
            if reserved {
                return Ok(Reservation::Acquired);
            }

            match self.store.get(key).await.map_err(unavailable)? {
                Some(value) if value == PENDING_MARKER => return Ok(Reservation::InFlight),
                Some(value) => {
                    return match serde_json::from_str::<ConsumeResult>(&value) {
                        Ok(result) => Ok(Reservation::Completed(result)),
                        Err(e) => {
                            tracing::warn!(error = %e, "Unreadable idempotency record");
                            Ok(Reservation::InFlight)
                        }
                    }
                }
                None => continue,
            }
        }
        Ok(Reservation::InFlight)
    }

    /// Stores the result for replay. Failures are logged: the consumption itself
    /// already succeeded.
    pub async fn complete(&self, key: &str, result: &ConsumeResult) {
        let value = match serde_json::to_string(result) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode idempotency record");
                return;
            }
        };
        if let Err(e) = self.store.set(key, value, self.ttl).await {
            tracing::error!(error = %e, "Failed to store idempotency record");
        }
    }

    /// Releases the key so the client can retry.
    pub async fn abandon(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(error = %e, "Failed to release idempotency key");
        }
    }
}

fn unavailable(e: Box<dyn std::error::Error + Send + Sync>) -> ApiError {
    tracing::error!(error = %e, "Idempotency store unavailable");
    ApiError::DownstreamFailure("idempotency store unavailable".to_string())
}
