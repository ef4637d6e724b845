//! HTTP surface of the action link service.

pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use auth_middleware::{Claims, JwtState, SessionUser};
pub use extract::TrustedProxies;
pub use routes::{build_router, AppState};
