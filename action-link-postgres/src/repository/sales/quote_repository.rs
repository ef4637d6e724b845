use action_link_db::models::quote::QuoteModel;
use action_link_db::repository::quote_repository::QuoteRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::{get_optional_heapless_string, TryFromRow};

pub struct QuoteRepositoryImpl {
    pool: Arc<PgPool>,
}

impl QuoteRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Marks a `sent` quote as accepted on the caller's connection.
    ///
    /// Returns `false` when the quote is missing, belongs to another tenant or is
    /// no longer `sent`.
    pub(crate) async fn accept(
        conn: &mut PgConnection,
        tenant_id: Uuid,
        id: Uuid,
        accepted_by_email: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let result = sqlx::query(
            r#"
            UPDATE quote
            SET status = 'accepted', accepted_at = $3, accepted_by_email = $4, updated_at = $3
            WHERE tenant_id = $1 AND id = $2 AND status = 'sent'
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(accepted_at)
        .bind(accepted_by_email)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

impl TryFromRow<PgRow> for QuoteModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(QuoteModel {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            status: row.try_get("status")?,
            accepted_at: row.try_get("accepted_at")?,
            accepted_by_email: get_optional_heapless_string(row, "accepted_by_email")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl QuoteRepository for QuoteRepositoryImpl {
    async fn load_quote(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<QuoteModel>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM quote WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|row| QuoteModel::try_from_row(&row)).transpose()
    }
}
