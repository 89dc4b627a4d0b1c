//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{AuthError, BallotError, DomainError, ExhibitError};
use projections::ProjectionError;
use record_store::RecordStoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or rejected admin credentials.
    Unauthorized(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Read model could not be built.
    Projection(ProjectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Projection(ProjectionError::Store(err)) => store_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match err {
        DomainError::Store(store_err) => store_error_to_response(store_err),
        DomainError::Exhibit(exhibit_err) => match exhibit_err {
            ExhibitError::NotFound(_) => (StatusCode::NOT_FOUND, exhibit_err.to_string()),
            ExhibitError::NameRequired | ExhibitError::MembersRequired => {
                (StatusCode::BAD_REQUEST, exhibit_err.to_string())
            }
        },
        DomainError::Ballot(ballot_err) => match ballot_err {
            BallotError::InvalidTransition { .. } => (StatusCode::CONFLICT, ballot_err.to_string()),
            BallotError::NameRequired
            | BallotError::RatingRequired
            | BallotError::InvalidRating(_)
            | BallotError::ExhibitRequired
            | BallotError::UnknownExhibit(_) => (StatusCode::BAD_REQUEST, ballot_err.to_string()),
        },
        DomainError::Auth(auth_err) => auth_error_to_response(auth_err),
        DomainError::ReviewNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
    }
}

fn store_error_to_response(err: RecordStoreError) -> (StatusCode, String) {
    match &err {
        RecordStoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        _ if err.is_unavailable() => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn auth_error_to_response(err: AuthError) -> (StatusCode, String) {
    match err {
        AuthError::MalformedAccount(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        AuthError::InvalidCredentials | AuthError::InvalidSession | AuthError::SessionExpired => {
            (StatusCode::UNAUTHORIZED, err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<BallotError> for ApiError {
    fn from(err: BallotError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}
