pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use postgres_repositories::PostgresRepositories;
pub use repository::action_link::action_link_repository::ActionLinkRepositoryImpl;
pub use repository::audit::audit_log_repository::AuditLogRepositoryImpl;
pub use repository::db_init::run_migrations;

#[cfg(test)]
pub mod test_helper;
