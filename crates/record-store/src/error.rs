use thiserror::Error;

use crate::DocumentId;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The document does not exist in the collection.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: DocumentId },

    /// The store could not be reached or refused the operation.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecordStoreError {
    /// Returns true if the error means the store itself failed, as opposed to
    /// a problem with the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RecordStoreError::Unavailable(_) | RecordStoreError::Database(_)
        )
    }
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, RecordStoreError>;
