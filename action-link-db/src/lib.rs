pub mod kv;
pub mod models;
pub mod repository;
pub mod utils;

pub use kv::*;
pub use models::*;
pub use repository::*;
