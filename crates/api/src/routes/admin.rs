//! Admin login and the results dashboard.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use domain::{AdminSession, SessionToken};
use projections::{Dashboard, Report};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

// -- Authentication --

/// Extracts the bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<SessionToken, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Missing Authorization header. Expected: Bearer <token>".to_string(),
            )
        })?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(SessionToken::new(token.trim())),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}

/// Resolves the admin session behind a request.
pub(crate) async fn require_admin<S: RecordStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<AdminSession, ApiError> {
    let token = bearer_token(headers)?;
    Ok(state.sessions.validate(&token).await?)
}

// -- Handlers --

/// POST /admin/login: trade credentials for a session token.
#[tracing::instrument(skip(state, payload), fields(username))]
pub async fn login<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    tracing::Span::current().record("username", req.username.trim());
    let session = state
        .sessions
        .login(req.username.trim(), &req.password)
        .await?;

    Ok(Json(LoginResponse {
        token: session.token.to_string(),
        username: session.username,
        expires_at: session.expires_at,
    }))
}

/// POST /admin/logout: end the caller's session.
#[tracing::instrument(skip(state, headers))]
pub async fn logout<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    if state.sessions.logout(&token).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::Unauthorized("Invalid or missing admin session".to_string()))
    }
}

/// GET /admin/dashboard: every aggregate, recomputed from the store.
#[tracing::instrument(skip(state, headers))]
pub async fn dashboard<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>, ApiError> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.dashboard.build().await?))
}

/// GET /admin/report: the dashboard as paginated plain text.
#[tracing::instrument(skip(state, headers))]
pub async fn report<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let session = require_admin(&state, &headers).await?;
    let dashboard = state.dashboard.build().await?;
    let report = Report::render(&dashboard, &state.report_options);

    tracing::info!(
        username = %session.username,
        pages = report.page_count(),
        "report exported"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.to_text(),
    ))
}
