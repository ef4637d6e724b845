pub mod tenant_membership_repository;

pub use tenant_membership_repository::TenantMembershipRepositoryImpl;
