use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::create::Create;
use async_trait::async_trait;
use std::error::Error;

use super::repo_impl::ActionLinkRepositoryImpl;
use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;

impl ActionLinkRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &ActionLinkRepositoryImpl,
        mut item: ActionLinkModel,
        audit: AuditLogModel,
    ) -> Result<ActionLinkModel, Box<dyn Error + Send + Sync>> {
        let audit = audit.chained_after(&item)?;
        item.attach_audit(&audit);

        let mut tx = repo.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO action_link
            (id, tenant_id, token_hash, email, action_type, metadata, expires_at, max_uses,
             use_count, status, created_by_user_id, created_at, last_verified_at, consumed_at,
             revoked_at, last_audit_log_id, last_audit_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(item.id)
        .bind(item.tenant_id)
        .bind(item.token_hash.as_str())
        .bind(item.email.as_str())
        .bind(item.action_type)
        .bind(&item.metadata)
        .bind(item.expires_at)
        .bind(item.max_uses)
        .bind(item.use_count)
        .bind(item.status)
        .bind(item.created_by_user_id)
        .bind(item.created_at)
        .bind(item.last_verified_at)
        .bind(item.consumed_at)
        .bind(item.revoked_at)
        .bind(item.last_audit_log_id)
        .bind(item.last_audit_hash)
        .execute(&mut *tx)
        .await?;

        AuditLogRepositoryImpl::append(&mut *tx, &audit).await?;
        tx.commit().await?;

        Ok(item)
    }
}

#[async_trait]
impl Create<ActionLinkModel> for ActionLinkRepositoryImpl {
    async fn create(
        &self,
        item: ActionLinkModel,
        audit: AuditLogModel,
    ) -> Result<ActionLinkModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item, audit).await
    }
}

#[cfg(test)]
mod tests {
    use action_link_api::AuditAction;
    use action_link_db::repository::{Create, Load, LoadAudits, PageRequest};
    use action_link_db::AuditLogModel;
    use serial_test::serial;

    use super::super::test_utils::{create_test_audit, create_test_link};
    use crate::test_helper::setup_test_repositories;

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_create_writes_link_and_audit(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories().await?.create_action_link_repositories();
        let repo = &repos.action_link_repository;

        let link = create_test_link(3);
        let audit = create_test_audit(&link, AuditAction::ActionLinkCreate);
        let saved = repo.create(link.clone(), audit.clone()).await?;

        assert_eq!(saved.last_audit_log_id, Some(audit.id));
        assert_ne!(saved.last_audit_hash, 0);

        let loaded = repo.load(link.id).await?.ok_or("link not found")?;
        assert_eq!(loaded.token_hash, link.token_hash);
        assert_eq!(loaded.email, link.email);
        assert_eq!(loaded.max_uses, 3);
        assert_eq!(loaded.use_count, 0);

        let trail = repo.load_audits(link.id, PageRequest::default()).await?;
        assert_eq!(trail.total, 1);
        assert_eq!(trail.items[0].action, AuditAction::ActionLinkCreate);
        assert!(AuditLogModel::verify_chain(&trail.items, true));

        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_duplicate_token_hash_is_rejected(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories().await?.create_action_link_repositories();
        let repo = &repos.action_link_repository;

        let first = create_test_link(1);
        repo.create(first.clone(), create_test_audit(&first, AuditAction::ActionLinkCreate))
            .await?;

        let mut second = create_test_link(1);
        second.token_hash = first.token_hash.clone();
        let result = repo
            .create(second.clone(), create_test_audit(&second, AuditAction::ActionLinkCreate))
            .await;
        assert!(result.is_err());

        // The failed insert must not leave an orphaned audit entry behind
        let trail = repo.load_audits(second.id, PageRequest::default()).await?;
        assert_eq!(trail.total, 0);

        Ok(())
    }
}
