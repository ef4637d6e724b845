use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Confirmed,
    Paid,
    Void,
}

/// Invoice a customer can confirm through an `invoice` action link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub status: InvoiceStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by_email: Option<HeaplessString<254>>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceModel {
    pub fn is_confirmable(&self) -> bool {
        self.status == InvoiceStatus::Sent
    }
}

impl Identifiable for InvoiceModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
