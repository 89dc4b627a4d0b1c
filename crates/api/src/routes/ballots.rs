//! The attendee voting wizard: review first, then pick an exhibit.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::DocumentId;
use domain::ballot::ReviewDraft;
use domain::{Ballot, BallotId, Review, ReviewInput};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::{AppState, BallotRegistry};

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default, alias = "exhibit_id")]
    pub exhibit_id: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotResponse {
    pub id: String,
    pub state: String,
    pub draft: Option<ReviewDraft>,
    pub selected_exhibit: Option<String>,
    pub review_id: Option<String>,
}

impl From<&Ballot> for BallotResponse {
    fn from(ballot: &Ballot) -> Self {
        Self {
            id: ballot.id().to_string(),
            state: ballot.state().to_string(),
            draft: ballot.draft().cloned(),
            selected_exhibit: ballot.selected_exhibit().map(|id| id.to_string()),
            review_id: ballot.review_id().map(|id| id.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub ballot: BallotResponse,
    pub review: Review,
    pub counter_updated: bool,
}

// -- Handlers --

/// POST /ballots: start a new ballot on the review form.
#[tracing::instrument(skip(state))]
pub async fn open<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<BallotResponse>) {
    let ballot = state.ballots.open().await;
    tracing::debug!(ballot_id = %ballot.id(), "ballot opened");
    (StatusCode::CREATED, Json(BallotResponse::from(&ballot)))
}

/// GET /ballots/{id}: current state of a ballot.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<BallotResponse>, ApiError> {
    let ballot = find(&state.ballots, &id).await?;
    let ballot = ballot.lock().await;
    Ok(Json(BallotResponse::from(&*ballot)))
}

/// POST /ballots/{id}/review: submit the review form.
#[tracing::instrument(skip(state, payload))]
pub async fn submit_review<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewInput>, JsonRejection>,
) -> Result<Json<BallotResponse>, ApiError> {
    let Json(input) = payload?;
    let ballot = find(&state.ballots, &id).await?;
    let mut ballot = ballot.lock().await;
    ballot.submit_review(input)?;
    Ok(Json(BallotResponse::from(&*ballot)))
}

/// POST /ballots/{id}/back: return to the review form.
#[tracing::instrument(skip(state))]
pub async fn back<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<BallotResponse>, ApiError> {
    let ballot = find(&state.ballots, &id).await?;
    let mut ballot = ballot.lock().await;
    ballot.back()?;
    Ok(Json(BallotResponse::from(&*ballot)))
}

/// POST /ballots/{id}/vote: cast the vote for one exhibit.
///
/// A confirmed ballot is final and is dropped from the registry.
#[tracing::instrument(skip(state, payload))]
pub async fn vote<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(req) = payload?;
    let ballot = find(&state.ballots, &id).await?;
    let mut ballot = ballot.lock().await;

    let exhibit_id = DocumentId::new(req.exhibit_id.trim());
    let receipt = state
        .ballot_service
        .submit_vote(&mut ballot, &exhibit_id)
        .await?;

    state.ballots.remove(ballot.id()).await;

    Ok(Json(VoteResponse {
        ballot: BallotResponse::from(&*ballot),
        review: receipt.review,
        counter_updated: receipt.counter_updated,
    }))
}

async fn find(
    ballots: &BallotRegistry,
    id: &str,
) -> Result<Arc<tokio::sync::Mutex<Ballot>>, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ballot id: {e}")))?;
    ballots
        .get(BallotId::from_uuid(uuid))
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Ballot {id} not found")))
}
