//! Review moderation for admins.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use projections::{ReviewListing, join_reviews_with_exhibit_names};
use record_store::RecordStore;

use super::admin::require_admin;
use super::parse_document_id;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /admin/reviews: every review with the name of its exhibit.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ReviewListing>>, ApiError> {
    require_admin(&state, &headers).await?;

    let exhibits = state.exhibit_service.list_exhibits().await?;
    let reviews = state.review_service.list_reviews().await?;
    Ok(Json(join_reviews_with_exhibit_names(&exhibits, &reviews)))
}

/// DELETE /admin/reviews/{id}
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    let id = parse_document_id(&id)?;
    state.review_service.delete_review(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
