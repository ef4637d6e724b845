use action_link_db::models::audit::AuditLogModel;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::error::Error;
use std::sync::Arc;

use crate::utils::{get_optional_heapless_string, TryFromRow};

pub struct AuditLogRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl AuditLogRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for AuditLogModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AuditLogModel {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            action: row.try_get("action")?,
            entity_type: row.try_get("entity_type")?,
            entity_id: row.try_get("entity_id")?,
            actor_user_id: row.try_get("actor_user_id")?,
            actor_email: get_optional_heapless_string(row, "actor_email")?,
            ip_address: get_optional_heapless_string(row, "ip_address")?,
            user_agent: row.try_get("user_agent")?,
            details: row.try_get("details")?,
            created_at: row.try_get("created_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
        })
    }
}
