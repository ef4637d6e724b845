use async_trait::async_trait;
use uuid::Uuid;

/// Tenant membership lookup used to authorize tenant-scoped operations
#[async_trait]
pub trait TenantMembershipRepository: Send + Sync {
    async fn is_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
