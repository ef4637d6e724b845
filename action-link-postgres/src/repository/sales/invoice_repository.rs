use action_link_db::models::invoice::InvoiceModel;
use action_link_db::repository::invoice_repository::InvoiceRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::{get_optional_heapless_string, TryFromRow};

pub struct InvoiceRepositoryImpl {
    pool: Arc<PgPool>,
}

impl InvoiceRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Marks a `sent` invoice as confirmed; `false` when it is missing or not `sent`
    pub(crate) async fn confirm(
        conn: &mut PgConnection,
        tenant_id: Uuid,
        id: Uuid,
        confirmed_by_email: &str,
        confirmed_at: DateTime<Utc>,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let result = sqlx::query(
            r#"
            UPDATE invoice
            SET status = 'confirmed', confirmed_at = $3, confirmed_by_email = $4, updated_at = $3
            WHERE tenant_id = $1 AND id = $2 AND status = 'sent'
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(confirmed_at)
        .bind(confirmed_by_email)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

impl TryFromRow<PgRow> for InvoiceModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(InvoiceModel {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            status: row.try_get("status")?,
            confirmed_at: row.try_get("confirmed_at")?,
            confirmed_by_email: get_optional_heapless_string(row, "confirmed_by_email")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl InvoiceRepository for InvoiceRepositoryImpl {
    async fn load_invoice(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<InvoiceModel>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM invoice WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|row| InvoiceModel::try_from_row(&row)).transpose()
    }
}
