use async_trait::async_trait;
use uuid::Uuid;

use crate::models::quote::QuoteModel;

/// Quote lookups for `quote` action links
///
/// Acceptance itself is written by [`crate::repository::ConsumeUse`], in the same
/// transaction as the spent use.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Load a quote, scoped to its tenant
    async fn load_quote(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<QuoteModel>, Box<dyn std::error::Error + Send + Sync>>;
}
