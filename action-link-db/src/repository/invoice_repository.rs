use async_trait::async_trait;
use uuid::Uuid;

use crate::models::invoice::InvoiceModel;

/// Invoice lookups for `invoice` action links
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn load_invoice(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<InvoiceModel>, Box<dyn std::error::Error + Send + Sync>>;
}
