use clap::Parser;
use std::time::Duration;

use crate::rate_limit::WindowLimit;

pub const DEFAULT_CAPTCHA_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Action link server.
///
/// Every option can also be supplied through the environment variable shown.
#[derive(Parser, Debug, Clone)]
#[command(name = "action-link-server", about = "Action link issuing and redemption service")]
pub struct Config {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub database_max_connections: u32,

    /// Pool acquire timeout and per-statement timeout, in seconds.
    #[arg(long, env = "DATABASE_TIMEOUT_SECS", default_value_t = 5)]
    pub database_timeout_secs: u64,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Reverse proxies in front of the server whose `X-Forwarded-For` entries are
    /// trusted. 0 keys rate limits on the socket peer address.
    #[arg(long, env = "TRUSTED_PROXY_HOPS", default_value_t = 0)]
    pub trusted_proxy_hops: usize,

    /// Origin that issued links point at, e.g. `https://app.example.com`.
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: String,

    /// HS256 secret used to validate session tokens.
    #[arg(long, env = "SESSION_JWT_SECRET", hide_env_values = true)]
    pub session_jwt_secret: String,

    #[arg(long, env = "CAPTCHA_SECRET", hide_env_values = true)]
    pub captcha_secret: String,

    #[arg(long, env = "CAPTCHA_VERIFY_URL", default_value = DEFAULT_CAPTCHA_VERIFY_URL)]
    pub captcha_verify_url: String,

    #[arg(long, env = "CAPTCHA_TIMEOUT_MS", default_value_t = 5000)]
    pub captcha_timeout_ms: u64,

    /// Capacity of the in-process key-value store.
    #[arg(long, env = "KV_MAX_ENTRIES", default_value_t = 100_000)]
    pub kv_max_entries: u64,

    #[arg(long, env = "VERIFY_IP_LIMIT", default_value_t = 20)]
    pub verify_ip_limit: u64,

    #[arg(long, env = "VERIFY_IP_WINDOW_SECS", default_value_t = 60)]
    pub verify_ip_window_secs: u64,

    #[arg(long, env = "VERIFY_TOKEN_LIMIT", default_value_t = 10)]
    pub verify_token_limit: u64,

    #[arg(long, env = "VERIFY_TOKEN_WINDOW_SECS", default_value_t = 600)]
    pub verify_token_window_secs: u64,

    #[arg(long, env = "CONSUME_IP_LIMIT", default_value_t = 10)]
    pub consume_ip_limit: u64,

    #[arg(long, env = "CONSUME_IP_WINDOW_SECS", default_value_t = 60)]
    pub consume_ip_window_secs: u64,

    #[arg(long, env = "IDEMPOTENCY_TTL_SECS", default_value_t = 60)]
    pub idempotency_ttl_secs: u64,

    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database_timeout_secs)
    }

    pub fn captcha_timeout(&self) -> Duration {
        Duration::from_millis(self.captcha_timeout_ms)
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            public_base_url: self.public_base_url.clone(),
            verify_ip_limit: WindowLimit::new(self.verify_ip_limit, self.verify_ip_window_secs),
            verify_token_limit: WindowLimit::new(
                self.verify_token_limit,
                self.verify_token_window_secs,
            ),
            consume_ip_limit: WindowLimit::new(self.consume_ip_limit, self.consume_ip_window_secs),
            idempotency_ttl: Duration::from_secs(self.idempotency_ttl_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }
}

/// Tunables of [`crate::ActionLinkService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub public_base_url: String,
    pub verify_ip_limit: WindowLimit,
    pub verify_token_limit: WindowLimit,
    pub consume_ip_limit: WindowLimit,
    pub idempotency_ttl: Duration,
    pub cache_ttl: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8080".to_string(),
            verify_ip_limit: WindowLimit::new(20, 60),
            verify_token_limit: WindowLimit::new(10, 600),
            consume_ip_limit: WindowLimit::new(10, 60),
            idempotency_ttl: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(60),
        }
    }
}
