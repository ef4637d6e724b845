pub mod cache;
pub mod captcha;
pub mod config;
pub mod effects;
pub mod http;
pub mod idempotency;
pub mod rate_limit;
pub mod service;
pub mod token;

#[cfg(test)]
pub mod testing;

pub use service::{ActionLinkService, ServiceDependencies};
