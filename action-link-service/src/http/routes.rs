//! Route registration.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use super::auth_middleware::{require_session, JwtState};
use super::extract::TrustedProxies;
use super::handlers;
use crate::service::ActionLinkService;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ActionLinkService>,
    pub jwt_state: Arc<JwtState>,
    pub trusted_proxies: TrustedProxies,
}

impl FromRef<AppState> for TrustedProxies {
    fn from_ref(state: &AppState) -> Self {
        state.trusted_proxies
    }
}

/// Tenant endpoints require a session; token-holder endpoints and `/health` are public.
pub fn build_router(state: AppState) -> Router {
    let tenant_routes = Router::new()
        .route("/action-links", post(handlers::issue))
        .route("/action-links/{id}/revoke", post(handlers::revoke))
        .route("/action-links/{id}/audit", get(handlers::audit_trail))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_state.clone(),
            require_session,
        ));

    let token_routes = Router::new()
        .route("/action-links/verify", post(handlers::verify))
        .route("/action-links/consume", post(handlers::consume));

    Router::new()
        .merge(tenant_routes)
        .merge(token_routes)
        .route("/health", get(handlers::health))
        .with_state(state)
}
