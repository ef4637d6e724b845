pub mod append;
pub mod load_audits;
pub mod repo_impl;

pub use repo_impl::AuditLogRepositoryImpl;
