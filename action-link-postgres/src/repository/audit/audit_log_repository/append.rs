use action_link_db::models::audit::AuditLogModel;
use sqlx::PgConnection;
use std::error::Error;

use super::repo_impl::AuditLogRepositoryImpl;

impl AuditLogRepositoryImpl {
    /// Inserts a sealed audit entry on the caller's connection.
    ///
    /// Callers pass the transaction that carries the audited change, so the entry
    /// commits or rolls back with it.
    pub async fn append(
        conn: &mut PgConnection,
        audit: &AuditLogModel,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO audit_log
            (id, tenant_id, action, entity_type, entity_id, actor_user_id, actor_email,
             ip_address, user_agent, details, created_at, antecedent_hash,
             antecedent_audit_log_id, hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(audit.id)
        .bind(audit.tenant_id)
        .bind(audit.action)
        .bind(audit.entity_type)
        .bind(audit.entity_id)
        .bind(audit.actor_user_id)
        .bind(audit.actor_email.as_deref())
        .bind(audit.ip_address.as_deref())
        .bind(audit.user_agent.as_deref())
        .bind(&audit.details)
        .bind(audit.created_at)
        .bind(audit.antecedent_hash)
        .bind(audit.antecedent_audit_log_id)
        .bind(audit.hash)
        .execute(conn)
        .await?;

        Ok(())
    }
}
