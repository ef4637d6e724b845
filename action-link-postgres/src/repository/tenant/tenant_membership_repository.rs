use action_link_db::repository::tenant_membership_repository::TenantMembershipRepository;
use async_trait::async_trait;
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

pub struct TenantMembershipRepositoryImpl {
    pool: Arc<PgPool>,
}

impl TenantMembershipRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantMembershipRepository for TenantMembershipRepositoryImpl {
    async fn is_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tenant_member WHERE tenant_id = $1 AND user_id = $2)",
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(exists)
    }
}
