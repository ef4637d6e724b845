use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::load_audits::LoadAudits;
use action_link_db::repository::pagination::{Page, PageRequest};
use async_trait::async_trait;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::AuditLogRepositoryImpl;
use crate::utils::TryFromRow;

impl AuditLogRepositoryImpl {
    pub(crate) async fn load_audits_impl(
        repo: &AuditLogRepositoryImpl,
        entity_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<AuditLogModel>, Box<dyn Error + Send + Sync>> {
        let limit = i64::try_from(page.limit)?;
        let offset = i64::try_from(page.offset)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log WHERE entity_id = $1")
            .bind(entity_id)
            .fetch_one(&*repo.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM audit_log
            WHERE entity_id = $1
            ORDER BY seq ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(entity_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&*repo.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AuditLogModel::try_from_row(&row)?);
        }

        Ok(Page::new(items, usize::try_from(total)?, page.limit, page.offset))
    }
}

#[async_trait]
impl LoadAudits for AuditLogRepositoryImpl {
    async fn load_audits(
        &self,
        entity_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<AuditLogModel>, Box<dyn Error + Send + Sync>> {
        Self::load_audits_impl(self, entity_id, page).await
    }
}
