//! Exhibit listing for voters and exhibit management for admins.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use domain::{CascadeReport, Exhibit, ExhibitDraft, ExhibitError, Review};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use super::admin::require_admin;
use super::parse_document_id;
use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct ExhibitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: String,
}

impl From<ExhibitRequest> for ExhibitDraft {
    fn from(req: ExhibitRequest) -> Self {
        ExhibitDraft::new(req.name, req.members)
    }
}

// -- Response types --

/// An exhibit as shown on the voting screen. The stored vote counter is left
/// out; results are only ever derived from reviews.
#[derive(Serialize)]
pub struct VotableExhibit {
    pub id: String,
    pub name: String,
    pub members: String,
}

impl From<Exhibit> for VotableExhibit {
    fn from(exhibit: Exhibit) -> Self {
        Self {
            id: exhibit.id.to_string(),
            name: exhibit.name,
            members: exhibit.members,
        }
    }
}

// -- Handlers --

/// GET /exhibits: the exhibits shown on the voting screen.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<VotableExhibit>>, ApiError> {
    let exhibits = state.ballot_service.votable_exhibits().await?;
    Ok(Json(exhibits.into_iter().map(VotableExhibit::from).collect()))
}

/// GET /admin/exhibits
#[tracing::instrument(skip(state, headers))]
pub async fn admin_list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Exhibit>>, ApiError> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.exhibit_service.list_exhibits().await?))
}

/// POST /admin/exhibits
#[tracing::instrument(skip(state, headers, payload))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<ExhibitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Exhibit>), ApiError> {
    require_admin(&state, &headers).await?;
    let Json(req) = payload?;
    let exhibit = state.exhibit_service.create_exhibit(req.into()).await?;
    Ok((StatusCode::CREATED, Json(exhibit)))
}

/// PUT /admin/exhibits/{id}
#[tracing::instrument(skip(state, headers, payload))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ExhibitRequest>, JsonRejection>,
) -> Result<Json<Exhibit>, ApiError> {
    require_admin(&state, &headers).await?;
    let Json(req) = payload?;
    let id = parse_document_id(&id)?;
    Ok(Json(
        state.exhibit_service.update_exhibit(&id, req.into()).await?,
    ))
}

/// DELETE /admin/exhibits/{id}: removes the exhibit and its reviews.
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CascadeReport>, ApiError> {
    let session = require_admin(&state, &headers).await?;
    let id = parse_document_id(&id)?;

    let report = state.exhibit_service.delete_exhibit(&id).await?;
    if !report.is_complete() {
        tracing::warn!(
            exhibit_id = %id,
            username = %session.username,
            reviews_failed = report.reviews_failed,
            review_lookup_failed = report.review_lookup_failed,
            "exhibit deleted but some reviews remain"
        );
    }
    Ok(Json(report))
}

/// GET /admin/exhibits/{id}/reviews: the reviews voting for one exhibit.
#[tracing::instrument(skip(state, headers))]
pub async fn reviews<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    require_admin(&state, &headers).await?;
    let id = parse_document_id(&id)?;

    if state.exhibit_service.get_exhibit(&id).await?.is_none() {
        return Err(ApiError::Domain(ExhibitError::NotFound(id).into()));
    }
    Ok(Json(state.review_service.reviews_for_exhibit(&id).await?))
}
