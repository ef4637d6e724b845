pub mod action_link_repository;
pub mod consume_use;
pub mod create;
pub mod find_by_token_hash;
pub mod invoice_repository;
pub mod load;
pub mod load_audits;
pub mod pagination;
pub mod quote_repository;
pub mod record_verification;
pub mod revoke;
pub mod tenant_membership_repository;
pub mod transition;

// Re-exports
pub use action_link_repository::*;
pub use consume_use::*;
pub use create::*;
pub use find_by_token_hash::*;
pub use invoice_repository::*;
pub use load::*;
pub use load_audits::*;
pub use pagination::*;
pub use quote_repository::*;
pub use record_verification::*;
pub use revoke::*;
pub use tenant_membership_repository::*;
pub use transition::*;
