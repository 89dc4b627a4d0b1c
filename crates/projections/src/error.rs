//! Projection error types.

use thiserror::Error;

/// Errors that can occur while building read models.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The record store could not be read.
    #[error("Record store error: {0}")]
    Store(#[from] record_store::RecordStoreError),
}

impl ProjectionError {
    /// Returns true if the failure is the store being unreachable.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ProjectionError::Store(e) => e.is_unavailable(),
        }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
