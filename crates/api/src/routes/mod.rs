//! HTTP route handlers.

pub mod admin;
pub mod ballots;
pub mod exhibits;
pub mod health;
pub mod metrics;
pub mod reviews;

use common::DocumentId;

use crate::error::ApiError;

/// Rejects blank path ids before they reach the store.
fn parse_document_id(id: &str) -> Result<DocumentId, ApiError> {
    let id = DocumentId::new(id.trim());
    if id.is_blank() {
        return Err(ApiError::BadRequest("Document id must not be empty".to_string()));
    }
    Ok(id)
}
