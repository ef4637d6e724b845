use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::transition::TransitionOutcome;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct ActionLinkRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
    pub(crate) audit_log_repository: Arc<AuditLogRepositoryImpl>,
}

impl ActionLinkRepositoryImpl {
    pub fn new(pool: Arc<PgPool>, audit_log_repository: Arc<AuditLogRepositoryImpl>) -> Self {
        Self {
            pool,
            audit_log_repository,
        }
    }

    /// Runs a guarded state change on one link in its own transaction.
    pub(super) async fn transition_impl(
        repo: &ActionLinkRepositoryImpl,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        precondition: fn(&ActionLinkModel, DateTime<Utc>) -> bool,
        apply: fn(&mut ActionLinkModel, DateTime<Utc>),
    ) -> Result<TransitionOutcome<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.pool.begin().await?;
        let outcome = Self::transition_on(&mut *tx, id, now, audit, precondition, apply).await?;

        if outcome.is_applied() {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(outcome)
    }

    /// Guarded state change on the caller's transaction.
    ///
    /// The row is locked with `FOR UPDATE`, `precondition` is evaluated against the
    /// locked row, and the update and its audit entry are written together. The
    /// update is additionally guarded on the state that was read, so it can never
    /// overwrite a change it did not see. Only an `Applied` outcome has written
    /// anything; the caller decides whether to commit.
    pub(super) async fn transition_on(
        conn: &mut PgConnection,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        precondition: fn(&ActionLinkModel, DateTime<Utc>) -> bool,
        apply: fn(&mut ActionLinkModel, DateTime<Utc>),
    ) -> Result<TransitionOutcome<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM action_link WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(TransitionOutcome::NotFound);
        };
        let current = ActionLinkModel::try_from_row(&row)?;

        if !precondition(&current, now) {
            return Ok(TransitionOutcome::Rejected(current));
        }

        let audit = audit.chained_after(&current)?;
        let mut updated = current.clone();
        apply(&mut updated, now);
        updated.attach_audit(&audit);

        let result = sqlx::query(
            r#"
            UPDATE action_link
            SET use_count = $2, status = $3, last_verified_at = $4, consumed_at = $5,
                revoked_at = $6, last_audit_log_id = $7, last_audit_hash = $8
            WHERE id = $1 AND use_count = $9 AND status = $10 AND last_audit_hash = $11
            "#,
        )
        .bind(updated.id)
        .bind(updated.use_count)
        .bind(updated.status)
        .bind(updated.last_verified_at)
        .bind(updated.consumed_at)
        .bind(updated.revoked_at)
        .bind(updated.last_audit_log_id)
        .bind(updated.last_audit_hash)
        .bind(current.use_count)
        .bind(current.status)
        .bind(current.last_audit_hash)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(TransitionOutcome::Rejected(current));
        }

        AuditLogRepositoryImpl::append(conn, &audit).await?;

        Ok(TransitionOutcome::Applied(updated))
    }
}

impl TryFromRow<PgRow> for ActionLinkModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ActionLinkModel {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            token_hash: get_heapless_string(row, "token_hash")?,
            email: get_heapless_string(row, "email")?,
            action_type: row.try_get("action_type")?,
            metadata: row.try_get("metadata")?,
            expires_at: row.try_get("expires_at")?,
            max_uses: row.try_get("max_uses")?,
            use_count: row.try_get("use_count")?,
            status: row.try_get("status")?,
            created_by_user_id: row.try_get("created_by_user_id")?,
            created_at: row.try_get("created_at")?,
            last_verified_at: row.try_get("last_verified_at")?,
            consumed_at: row.try_get("consumed_at")?,
            revoked_at: row.try_get("revoked_at")?,
            last_audit_log_id: row.try_get("last_audit_log_id")?,
            last_audit_hash: row.try_get("last_audit_hash")?,
        })
    }
}
