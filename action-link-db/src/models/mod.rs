pub mod action_link;
pub mod audit;
pub mod auditable;
pub mod identifiable;
pub mod invoice;
pub mod quote;

// Re-exports
pub use action_link::*;
pub use audit::*;
pub use auditable::*;
pub use identifiable::*;
pub use invoice::*;
pub use quote::*;
