use action_link_api::{
    ApiError, AuditTrailQuery, ConsumeActionLinkRequest, ConsumeActionLinkResponse,
    IssueActionLinkRequest, VerifyActionLinkRequest, VerifyActionLinkResponse,
    IDEMPOTENCY_KEY_HEADER,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use uuid::Uuid;

use super::auth_middleware::SessionUser;
use super::error::{EnvelopeError, PlainError};
use super::extract::{header_str, ClientContext};
use super::routes::AppState;

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::ValidationError(rejection.body_text())
}

pub async fn issue(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    ClientContext(metadata): ClientContext,
    payload: Result<Json<IssueActionLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PlainError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let response = state
        .service
        .issue(session.user_id, request, &metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn verify(
    State(state): State<AppState>,
    ClientContext(metadata): ClientContext,
    payload: Result<Json<VerifyActionLinkRequest>, JsonRejection>,
) -> Result<Json<VerifyActionLinkResponse>, EnvelopeError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let data = state.service.verify(request, &metadata).await?;
    Ok(Json(VerifyActionLinkResponse { ok: true, data }))
}

pub async fn consume(
    State(state): State<AppState>,
    ClientContext(metadata): ClientContext,
    headers: HeaderMap,
    payload: Result<Json<ConsumeActionLinkRequest>, JsonRejection>,
) -> Result<Json<ConsumeActionLinkResponse>, EnvelopeError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let idempotency_key = header_str(&headers, IDEMPOTENCY_KEY_HEADER);
    let result = state
        .service
        .consume(request, idempotency_key, &metadata)
        .await?;
    Ok(Json(result.into()))
}

pub async fn revoke(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    ClientContext(metadata): ClientContext,
    link_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PlainError> {
    let Path(link_id) =
        link_id.map_err(|rejection| ApiError::ValidationError(rejection.body_text()))?;
    let response = state
        .service
        .revoke(session.user_id, link_id, &metadata)
        .await?;
    Ok(Json(response))
}

pub async fn audit_trail(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    link_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<AuditTrailQuery>, QueryRejection>,
) -> Result<impl IntoResponse, PlainError> {
    let Path(link_id) =
        link_id.map_err(|rejection| ApiError::ValidationError(rejection.body_text()))?;
    let Query(query) =
        query.map_err(|rejection| ApiError::ValidationError(rejection.body_text()))?;
    let trail = state
        .service
        .audit_trail(session.user_id, link_id, query)
        .await?;
    Ok(Json(trail))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
    }))
}
