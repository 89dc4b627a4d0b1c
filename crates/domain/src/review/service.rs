//! Review service for the admin screens.

use common::DocumentId;
use record_store::{REVIEWS, RecordStore, RecordStoreExt};
use serde_json::Value;

use crate::error::DomainError;

use super::{Review, SELECTED_EXHIBIT_FIELD};

/// Service for reading and deleting reviews.
pub struct ReviewService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ReviewService<S> {
    /// Creates a new review service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists all reviews in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list_reviews(&self) -> Result<Vec<Review>, DomainError> {
        Ok(self.store.list_decoded(REVIEWS).await?)
    }

    /// Lists the reviews that vote for one exhibit.
    #[tracing::instrument(skip(self))]
    pub async fn reviews_for_exhibit(
        &self,
        exhibit_id: &DocumentId,
    ) -> Result<Vec<Review>, DomainError> {
        Ok(self
            .store
            .query_decoded(
                REVIEWS,
                SELECTED_EXHIBIT_FIELD,
                &Value::String(exhibit_id.to_string()),
            )
            .await?)
    }

    /// Deletes one review.
    #[tracing::instrument(skip(self))]
    pub async fn delete_review(&self, id: &DocumentId) -> Result<(), DomainError> {
        if !self.store.exists(REVIEWS, id).await? {
            return Err(DomainError::ReviewNotFound(id.clone()));
        }
        self.store.delete(REVIEWS, id).await?;
        tracing::info!(review_id = %id, "review deleted");
        Ok(())
    }
}
