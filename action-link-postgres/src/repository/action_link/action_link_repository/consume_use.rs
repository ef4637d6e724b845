use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::consume_use::{ConsumeOutcome, ConsumeUse, TargetUpdate};
use action_link_db::repository::transition::TransitionOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ActionLinkRepositoryImpl;
use crate::repository::sales::{InvoiceRepositoryImpl, QuoteRepositoryImpl};

impl ActionLinkRepositoryImpl {
    async fn apply_target(
        conn: &mut PgConnection,
        link: &ActionLinkModel,
        target: &TargetUpdate,
        now: DateTime<Utc>,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        match target {
            TargetUpdate::None => Ok(true),
            TargetUpdate::AcceptQuote {
                quote_id,
                accepted_by_email,
            } => {
                QuoteRepositoryImpl::accept(conn, link.tenant_id, *quote_id, accepted_by_email, now)
                    .await
            }
            TargetUpdate::ConfirmInvoice {
                invoice_id,
                confirmed_by_email,
            } => {
                InvoiceRepositoryImpl::confirm(
                    conn,
                    link.tenant_id,
                    *invoice_id,
                    confirmed_by_email,
                    now,
                )
                .await
            }
        }
    }
}

#[async_trait]
impl ConsumeUse for ActionLinkRepositoryImpl {
    async fn consume_use(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        target: &TargetUpdate,
    ) -> Result<ConsumeOutcome, Box<dyn Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        let outcome = Self::transition_on(
            &mut *tx,
            id,
            now,
            audit,
            |link, now| link.check_usable(now).is_ok(),
            ActionLinkModel::apply_use,
        )
        .await?;

        let consumed = match outcome {
            TransitionOutcome::Applied(consumed) => consumed,
            TransitionOutcome::Rejected(current) => {
                tx.rollback().await?;
                return Ok(ConsumeOutcome::Rejected(current));
            }
            TransitionOutcome::NotFound => {
                tx.rollback().await?;
                return Ok(ConsumeOutcome::NotFound);
            }
        };

        if !Self::apply_target(&mut *tx, &consumed, target, now).await? {
            tx.rollback().await?;
            return Ok(ConsumeOutcome::TargetUnavailable);
        }

        tx.commit().await?;
        Ok(ConsumeOutcome::Consumed(consumed))
    }
}

#[cfg(test)]
mod tests {
    use action_link_api::{ActionLinkStatus, ActionType, AuditAction, TARGET_ID_KEY};
    use action_link_db::models::quote::QuoteStatus;
    use action_link_db::repository::{
        ConsumeOutcome, ConsumeUse, Create, Load, LoadAudits, PageRequest, QuoteRepository,
        TargetUpdate,
    };
    use action_link_db::AuditLogModel;
    use chrono::{Duration, Utc};
    use serial_test::serial;
    use uuid::Uuid;

    use super::super::test_utils::{create_test_audit, create_test_link};
    use crate::test_helper::setup_test_repositories;

    fn consume_audit(link: &action_link_db::ActionLinkModel) -> AuditLogModel {
        create_test_audit(link, AuditAction::ActionLinkConsume)
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_consume_until_exhausted(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories()
            .await?
            .create_action_link_repositories();
        let repo = &repos.action_link_repository;

        let link = create_test_link(2);
        repo.create(link.clone(), create_test_audit(&link, AuditAction::ActionLinkCreate))
            .await?;

        let first = repo
            .consume_use(link.id, Utc::now(), consume_audit(&link), &TargetUpdate::None)
            .await?;
        assert!(matches!(first, ConsumeOutcome::Consumed(_)));

        let second = repo
            .consume_use(link.id, Utc::now(), consume_audit(&link), &TargetUpdate::None)
            .await?;
        let ConsumeOutcome::Consumed(consumed) = second else {
            return Err("second use was not applied".into());
        };
        assert_eq!(consumed.use_count, 2);
        assert_eq!(consumed.status, ActionLinkStatus::Consumed);
        assert!(consumed.consumed_at.is_some());

        let third = repo
            .consume_use(link.id, Utc::now(), consume_audit(&link), &TargetUpdate::None)
            .await?;
        assert!(matches!(third, ConsumeOutcome::Rejected(_)));

        let trail = repo.load_audits(link.id, PageRequest::default()).await?;
        assert_eq!(trail.total, 3);
        assert!(AuditLogModel::verify_chain(&trail.items, true));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_concurrent_consume_has_one_winner(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories()
            .await?
            .create_action_link_repositories();
        let repo = repos.action_link_repository.clone();

        let link = create_test_link(1);
        repo.create(link.clone(), create_test_audit(&link, AuditAction::ActionLinkCreate))
            .await?;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let link = link.clone();
            handles.push(tokio::spawn(async move {
                repo.consume_use(link.id, Utc::now(), consume_audit(&link), &TargetUpdate::None)
                    .await
                    .map(|outcome| matches!(outcome, ConsumeOutcome::Consumed(_)))
                    .map_err(|e| e.to_string())
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if handle.await?? {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);

        let stored = repo.load(link.id).await?.ok_or("link not found")?;
        assert_eq!(stored.use_count, 1);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_expired_link_is_not_consumed(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories()
            .await?
            .create_action_link_repositories();
        let repo = &repos.action_link_repository;

        let link = create_test_link(5);
        repo.create(link.clone(), create_test_audit(&link, AuditAction::ActionLinkCreate))
            .await?;

        let after_expiry = link.expires_at + Duration::seconds(1);
        let outcome = repo
            .consume_use(link.id, after_expiry, consume_audit(&link), &TargetUpdate::None)
            .await?;
        let ConsumeOutcome::Rejected(current) = outcome else {
            return Err("expired link was consumed".into());
        };
        assert_eq!(current.use_count, 0);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_declined_quote_rolls_back_the_use(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_test_repositories().await?;
        let links = repos.create_action_link_repositories().action_link_repository;
        let quotes = repos.create_sales_repositories().quote_repository;

        let mut link = create_test_link(1);
        let quote_id = Uuid::new_v4();
        link.action_type = ActionType::Quote;
        link.metadata = serde_json::json!({ TARGET_ID_KEY: quote_id.to_string() });
        sqlx::query("INSERT INTO quote (id, tenant_id, status) VALUES ($1, $2, 'declined')")
            .bind(quote_id)
            .bind(link.tenant_id)
            .execute(&**repos.pool())
            .await?;
        links
            .create(link.clone(), create_test_audit(&link, AuditAction::ActionLinkCreate))
            .await?;

        let target = TargetUpdate::AcceptQuote {
            quote_id,
            accepted_by_email: link.email.to_string(),
        };
        let outcome = links
            .consume_use(link.id, Utc::now(), consume_audit(&link), &target)
            .await?;
        assert_eq!(outcome, ConsumeOutcome::TargetUnavailable);

        let stored = links.load(link.id).await?.ok_or("link not found")?;
        assert_eq!(stored.use_count, 0);
        assert_eq!(stored.status, ActionLinkStatus::Active);
        assert_eq!(links.load_audits(link.id, PageRequest::default()).await?.total, 1);

        sqlx::query("UPDATE quote SET status = 'sent' WHERE id = $1")
            .bind(quote_id)
            .execute(&**repos.pool())
            .await?;
        let outcome = links
            .consume_use(link.id, Utc::now(), consume_audit(&link), &target)
            .await?;
        assert!(matches!(outcome, ConsumeOutcome::Consumed(_)));

        let quote = quotes
            .load_quote(link.tenant_id, quote_id)
            .await?
            .ok_or("quote not found")?;
        assert_eq!(quote.status, QuoteStatus::Accepted);
        Ok(())
    }
}
