//! Domain error types.

use record_store::RecordStoreError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::ballot::BallotError;
use crate::exhibit::ExhibitError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] RecordStoreError),

    /// An exhibit operation was rejected.
    #[error("Exhibit error: {0}")]
    Exhibit(#[from] ExhibitError),

    /// A ballot transition was rejected.
    #[error("Ballot error: {0}")]
    Ballot(#[from] BallotError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Review not found.
    #[error("Review not found: {0}")]
    ReviewNotFound(common::DocumentId),
}
