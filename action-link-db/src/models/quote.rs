use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
}

/// Sales quote a customer can accept through a `quote` action link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub status: QuoteStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by_email: Option<HeaplessString<254>>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteModel {
    /// Only quotes sent to the customer can be accepted.
    pub fn is_acceptable(&self) -> bool {
        self.status == QuoteStatus::Sent
    }
}

impl Identifiable for QuoteModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
