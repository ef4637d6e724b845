pub mod audit_entity_type;
pub mod audit_log;

pub use audit_entity_type::*;
pub use audit_log::*;
