pub mod action_type;
pub mod audit;
pub mod consume;
pub mod issue;
pub mod validation;
pub mod verify;

pub use action_type::*;
pub use audit::*;
pub use consume::*;
pub use issue::*;
pub use validation::*;
pub use verify::*;
