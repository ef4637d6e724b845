use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::action_link::action_link_repository::ActionLinkRepositoryImpl;
use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;
use crate::repository::sales::{InvoiceRepositoryImpl, QuoteRepositoryImpl};
use crate::repository::tenant::TenantMembershipRepositoryImpl;

/// Builds the PostgreSQL repositories over one shared pool.
///
/// Each repository operation runs in its own transaction taken from the pool.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    pub fn create_action_link_repositories(&self) -> ActionLinkRepositories {
        let audit_log_repository = Arc::new(AuditLogRepositoryImpl::new(self.pool.clone()));
        let action_link_repository = Arc::new(ActionLinkRepositoryImpl::new(
            self.pool.clone(),
            audit_log_repository.clone(),
        ));
        ActionLinkRepositories {
            action_link_repository,
            audit_log_repository,
        }
    }

    pub fn create_tenant_repositories(&self) -> TenantRepositories {
        TenantRepositories {
            tenant_membership_repository: Arc::new(TenantMembershipRepositoryImpl::new(
                self.pool.clone(),
            )),
        }
    }

    pub fn create_sales_repositories(&self) -> SalesRepositories {
        SalesRepositories {
            quote_repository: Arc::new(QuoteRepositoryImpl::new(self.pool.clone())),
            invoice_repository: Arc::new(InvoiceRepositoryImpl::new(self.pool.clone())),
        }
    }
}

pub struct ActionLinkRepositories {
    pub action_link_repository: Arc<ActionLinkRepositoryImpl>,
    pub audit_log_repository: Arc<AuditLogRepositoryImpl>,
}

pub struct TenantRepositories {
    pub tenant_membership_repository: Arc<TenantMembershipRepositoryImpl>,
}

pub struct SalesRepositories {
    pub quote_repository: Arc<QuoteRepositoryImpl>,
    pub invoice_repository: Arc<InvoiceRepositoryImpl>,
}
