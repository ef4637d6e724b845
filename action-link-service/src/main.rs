//! `action-link-server` - the action link HTTP server.
//!
//! Configuration comes from command-line flags or the matching environment
//! variables; see `action-link-server --help`.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use action_link_db::kv::MokaKeyValueStore;
use action_link_postgres::{run_migrations, PostgresRepositories};
use action_link_service::captcha::TurnstileVerifier;
use action_link_service::config::Config;
use action_link_service::http::{build_router, AppState, JwtState, TrustedProxies};
use action_link_service::{ActionLinkService, ServiceDependencies};
use anyhow::Context;
use clap::Parser;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::parse();

    let statement_timeout_ms = config.database_timeout().as_millis().to_string();
    let connect_options = PgConnectOptions::from_str(&config.database_url)
        .context("invalid DATABASE_URL")?
        .options([("statement_timeout", statement_timeout_ms.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_timeout())
        .connect_with(connect_options)
        .await
        .context("failed to connect to PostgreSQL")?;

    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database migrations applied");

    let repositories = PostgresRepositories::new(Arc::new(pool));
    let action_link_repositories = repositories.create_action_link_repositories();
    let tenant_repositories = repositories.create_tenant_repositories();
    let sales_repositories = repositories.create_sales_repositories();

    let captcha = TurnstileVerifier::new(
        config.captcha_secret.clone(),
        config.captcha_verify_url.clone(),
        config.captcha_timeout(),
    )
    .context("failed to build captcha client")?;

    let deps = ServiceDependencies {
        links: action_link_repositories.action_link_repository,
        memberships: tenant_repositories.tenant_membership_repository,
        quotes: sales_repositories.quote_repository,
        invoices: sales_repositories.invoice_repository,
        kv: Arc::new(MokaKeyValueStore::new(config.kv_max_entries)),
        captcha: Arc::new(captcha),
    };
    let service = Arc::new(ActionLinkService::new(deps, config.service_settings()));

    let app = build_router(AppState {
        service,
        jwt_state: Arc::new(JwtState::from_secret(&config.session_jwt_secret)),
        trusted_proxies: TrustedProxies::new(config.trusted_proxy_hops),
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("Action link server listening on {}", config.listen_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
