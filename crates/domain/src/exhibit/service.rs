//! Exhibit service providing the admin management operations.

use common::DocumentId;
use futures_util::future::join_all;
use record_store::{Document, EXHIBITS, REVIEWS, RecordStore, RecordStoreExt};
use serde::Serialize;
use serde_json::Value;

use crate::error::DomainError;
use crate::review::SELECTED_EXHIBIT_FIELD;

use super::{Exhibit, ExhibitDraft, ExhibitError};

/// Outcome of deleting an exhibit together with its reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    /// Reviews removed along with the exhibit.
    pub reviews_deleted: usize,
    /// Reviews whose deletion failed and that are now orphaned.
    pub reviews_failed: usize,
    /// True if the lookup of referencing reviews itself failed.
    pub review_lookup_failed: bool,
}

impl CascadeReport {
    /// Returns true if every referencing review was removed.
    pub fn is_complete(&self) -> bool {
        self.reviews_failed == 0 && !self.review_lookup_failed
    }
}

/// Service for managing exhibits.
pub struct ExhibitService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ExhibitService<S> {
    /// Creates a new exhibit service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists all exhibits in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list_exhibits(&self) -> Result<Vec<Exhibit>, DomainError> {
        Ok(self.store.list_decoded(EXHIBITS).await?)
    }

    /// Loads an exhibit by ID.
    ///
    /// Returns None if the exhibit doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_exhibit(&self, id: &DocumentId) -> Result<Option<Exhibit>, DomainError> {
        Ok(self.store.get_decoded(EXHIBITS, id).await?)
    }

    /// Creates a new exhibit.
    #[tracing::instrument(skip(self))]
    pub async fn create_exhibit(&self, draft: ExhibitDraft) -> Result<Exhibit, DomainError> {
        draft.validate()?;

        let id = self
            .store
            .add(EXHIBITS, Document::fields_of(&draft)?)
            .await?;
        tracing::info!(exhibit_id = %id, name = %draft.name, "exhibit created");

        Ok(Exhibit::new(id, draft.name, draft.members))
    }

    /// Replaces the name and members of an existing exhibit.
    #[tracing::instrument(skip(self))]
    pub async fn update_exhibit(
        &self,
        id: &DocumentId,
        draft: ExhibitDraft,
    ) -> Result<Exhibit, DomainError> {
        draft.validate()?;

        if !self.store.exists(EXHIBITS, id).await? {
            return Err(ExhibitError::NotFound(id.clone()).into());
        }
        self.store
            .update(EXHIBITS, id, Document::fields_of(&draft)?)
            .await?;

        self.get_exhibit(id)
            .await?
            .ok_or_else(|| ExhibitError::NotFound(id.clone()).into())
    }

    /// Deletes an exhibit and every review that references it.
    ///
    /// Reviews are deleted first, concurrently, and all deletions are awaited
    /// before the exhibit itself is removed. Failures while removing reviews
    /// are logged and reported but never prevent the exhibit deletion.
    #[tracing::instrument(skip(self))]
    pub async fn delete_exhibit(&self, id: &DocumentId) -> Result<CascadeReport, DomainError> {
        if !self.store.exists(EXHIBITS, id).await? {
            return Err(ExhibitError::NotFound(id.clone()).into());
        }

        let mut report = CascadeReport::default();

        let referencing = match self
            .store
            .query_where(REVIEWS, SELECTED_EXHIBIT_FIELD, &Value::String(id.to_string()))
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!(exhibit_id = %id, error = %e, "failed to look up reviews for cascade");
                report.review_lookup_failed = true;
                Vec::new()
            }
        };

        let deletions = referencing
            .iter()
            .map(|document| self.store.delete(REVIEWS, &document.id));
        let results = join_all(deletions).await;

        for (document, result) in referencing.iter().zip(results) {
            match result {
                Ok(()) => report.reviews_deleted += 1,
                Err(e) => {
                    metrics::counter!("cascade_review_delete_failures_total").increment(1);
                    tracing::warn!(
                        exhibit_id = %id,
                        review_id = %document.id,
                        error = %e,
                        "failed to delete review during cascade"
                    );
                    report.reviews_failed += 1;
                }
            }
        }

        self.store.delete(EXHIBITS, id).await?;

        metrics::counter!("exhibits_deleted_total").increment(1);
        tracing::info!(
            exhibit_id = %id,
            reviews_deleted = report.reviews_deleted,
            reviews_failed = report.reviews_failed,
            "exhibit deleted"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::NewReview;
    use crate::review::Rating;
    use chrono::Utc;
    use record_store::InMemoryRecordStore;

    async fn add_review(store: &InMemoryRecordStore, exhibit: &DocumentId) -> DocumentId {
        let review = NewReview {
            name: "Ana".to_string(),
            review: String::new(),
            rating: Rating::new(4).unwrap(),
            selected_exhibit: exhibit.clone(),
            timestamp: Utc::now(),
        };
        store
            .add(REVIEWS, Document::fields_of(&review).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_exhibit() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());

        let exhibit = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana, Ben"))
            .await
            .unwrap();

        assert_eq!(exhibit.name, "Volcano");
        assert_eq!(exhibit.votes, 0);
        assert_eq!(store.count(EXHIBITS).await, 1);
    }

    #[tokio::test]
    async fn test_create_exhibit_requires_fields() {
        let service = ExhibitService::new(InMemoryRecordStore::new());

        let result = service.create_exhibit(ExhibitDraft::new("Volcano", "")).await;
        assert!(matches!(
            result,
            Err(DomainError::Exhibit(ExhibitError::MembersRequired))
        ));
    }

    #[tokio::test]
    async fn test_update_exhibit_keeps_votes() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());
        let exhibit = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana"))
            .await
            .unwrap();
        store.increment(EXHIBITS, &exhibit.id, "votes", 3).await.unwrap();

        let updated = service
            .update_exhibit(&exhibit.id, ExhibitDraft::new("Super Volcano", "Ana, Ben"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Super Volcano");
        assert_eq!(updated.members, "Ana, Ben");
        assert_eq!(updated.votes, 3);
    }

    #[tokio::test]
    async fn test_update_missing_exhibit() {
        let service = ExhibitService::new(InMemoryRecordStore::new());
        let result = service
            .update_exhibit(&DocumentId::new("ghost"), ExhibitDraft::new("a", "b"))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Exhibit(ExhibitError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_reviews() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());
        let volcano = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana"))
            .await
            .unwrap();
        let battery = service
            .create_exhibit(ExhibitDraft::new("Battery", "Ben"))
            .await
            .unwrap();
        for _ in 0..3 {
            add_review(&store, &volcano.id).await;
        }
        add_review(&store, &battery.id).await;

        let report = service.delete_exhibit(&volcano.id).await.unwrap();

        assert_eq!(report.reviews_deleted, 3);
        assert!(report.is_complete());
        assert!(service.get_exhibit(&volcano.id).await.unwrap().is_none());
        let remaining = store
            .query_where(
                REVIEWS,
                SELECTED_EXHIBIT_FIELD,
                &Value::String(volcano.id.to_string()),
            )
            .await
            .unwrap();
        assert!(remaining.is_empty());
        assert_eq!(store.count(REVIEWS).await, 1);
    }

    #[tokio::test]
    async fn test_delete_without_reviews() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());
        let exhibit = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana"))
            .await
            .unwrap();

        let report = service.delete_exhibit(&exhibit.id).await.unwrap();

        assert_eq!(report, CascadeReport::default());
        assert_eq!(store.count(EXHIBITS).await, 0);
    }

    #[tokio::test]
    async fn test_delete_survives_partial_review_failure() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());
        let exhibit = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana"))
            .await
            .unwrap();
        add_review(&store, &exhibit.id).await;
        let stuck = add_review(&store, &exhibit.id).await;
        store.fail_delete_of(stuck.clone()).await;

        let report = service.delete_exhibit(&exhibit.id).await.unwrap();

        assert_eq!(report.reviews_deleted, 1);
        assert_eq!(report.reviews_failed, 1);
        assert!(!report.is_complete());
        assert!(service.get_exhibit(&exhibit.id).await.unwrap().is_none());
        assert!(store.exists(REVIEWS, &stuck).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_survives_review_lookup_failure() {
        let store = InMemoryRecordStore::new();
        let service = ExhibitService::new(store.clone());
        let exhibit = service
            .create_exhibit(ExhibitDraft::new("Volcano", "Ana"))
            .await
            .unwrap();
        let orphan = add_review(&store, &exhibit.id).await;
        store.set_fail_on_query(true).await;

        let report = service.delete_exhibit(&exhibit.id).await.unwrap();

        assert!(report.review_lookup_failed);
        assert_eq!(report.reviews_deleted, 0);
        assert_eq!(report.reviews_failed, 0);
        assert!(!report.is_complete());
        assert!(service.get_exhibit(&exhibit.id).await.unwrap().is_none());
        assert!(store.exists(REVIEWS, &orphan).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_exhibit() {
        let service = ExhibitService::new(InMemoryRecordStore::new());
        let result = service.delete_exhibit(&DocumentId::new("ghost")).await;
        assert!(matches!(
            result,
            Err(DomainError::Exhibit(ExhibitError::NotFound(_)))
        ));
    }
}
