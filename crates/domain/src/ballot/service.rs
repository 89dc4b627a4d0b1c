//! Ballot service: casts the vote against the record store.

use chrono::Utc;
use common::DocumentId;
use record_store::{Document, EXHIBITS, REVIEWS, RecordStore, RecordStoreExt};
use serde::Serialize;

use crate::error::DomainError;
use crate::exhibit::{Exhibit, VOTES_FIELD};
use crate::review::Review;

use super::Ballot;

/// What was written when a vote was cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub review: Review,
    /// False if the exhibit's vote counter could not be bumped. Results are
    /// derived from reviews, so the vote still counts.
    pub counter_updated: bool,
}

/// Service that turns a completed ballot into stored records.
pub struct BallotService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> BallotService<S> {
    /// Creates a new ballot service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists the exhibits that can currently be voted for.
    #[tracing::instrument(skip(self))]
    pub async fn votable_exhibits(&self) -> Result<Vec<Exhibit>, DomainError> {
        Ok(self.store.list_decoded(EXHIBITS).await?)
    }

    /// Casts the ballot's vote for `exhibit_id`.
    ///
    /// Writes one review, then bumps the exhibit's vote counter, then marks
    /// the ballot confirmed. The two writes are not atomic:
    /// - if the review cannot be written, the ballot is left untouched so the
    ///   attendee can resubmit;
    /// - if only the counter bump fails, the failure is logged and the ballot
    ///   is still confirmed, since results are recomputed from reviews.
    #[tracing::instrument(skip(self, ballot), fields(ballot_id = %ballot.id()))]
    pub async fn submit_vote(
        &self,
        ballot: &mut Ballot,
        exhibit_id: &DocumentId,
    ) -> Result<VoteReceipt, DomainError> {
        let exhibits = self.votable_exhibits().await?;
        let new_review = ballot.prepare_vote(exhibit_id, &exhibits, Utc::now())?;

        let review_id = self
            .store
            .add(REVIEWS, Document::fields_of(&new_review)?)
            .await?;

        let counter_updated = match self
            .store
            .increment(EXHIBITS, exhibit_id, VOTES_FIELD, 1)
            .await
        {
            Ok(votes) => {
                tracing::debug!(exhibit_id = %exhibit_id, votes, "vote counter bumped");
                true
            }
            Err(e) => {
                metrics::counter!("vote_counter_increment_failures_total").increment(1);
                tracing::warn!(
                    exhibit_id = %exhibit_id,
                    review_id = %review_id,
                    error = %e,
                    "review stored but vote counter not bumped"
                );
                false
            }
        };

        ballot.confirm(exhibit_id.clone(), review_id.clone())?;

        metrics::counter!("votes_submitted_total").increment(1);
        tracing::info!(exhibit_id = %exhibit_id, review_id = %review_id, "vote submitted");

        Ok(VoteReceipt {
            review: new_review.into_review(review_id),
            counter_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use record_store::InMemoryRecordStore;
    use serde_json::json;

    use super::*;
    use crate::ballot::{BallotError, BallotState, ReviewInput};

    async fn seeded_store() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        store
            .insert_with_id(
                EXHIBITS,
                DocumentId::new("a"),
                Document::fields_of(&json!({"name": "Volcano", "members": "Ana"})).unwrap(),
            )
            .await;
        store
    }

    fn reviewed_ballot() -> Ballot {
        let mut ballot = Ballot::new();
        ballot
            .submit_review(ReviewInput::new("Ben", 5).with_review("Great"))
            .unwrap();
        ballot
    }

    #[tokio::test]
    async fn test_submit_vote_writes_review_and_bumps_counter() {
        let store = seeded_store().await;
        let service = BallotService::new(store.clone());
        let mut ballot = reviewed_ballot();

        let receipt = service
            .submit_vote(&mut ballot, &DocumentId::new("a"))
            .await
            .unwrap();

        assert!(receipt.counter_updated);
        assert_eq!(ballot.state(), BallotState::Confirmed);
        assert_eq!(ballot.review_id(), Some(&receipt.review.id));

        let stored: Vec<Review> = store.list_decoded(REVIEWS).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Ben");
        assert_eq!(stored[0].review, "Great");
        assert_eq!(stored[0].selected_exhibit, Some(DocumentId::new("a")));
        assert!(stored[0].timestamp.is_some());

        let exhibit: Exhibit = store
            .get_decoded(EXHIBITS, &DocumentId::new("a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exhibit.votes, 1);
    }

    #[tokio::test]
    async fn test_failed_review_write_leaves_ballot_unchanged() {
        let store = seeded_store().await;
        let service = BallotService::new(store.clone());
        let mut ballot = reviewed_ballot();

        store.set_unavailable(true).await;
        let result = service.submit_vote(&mut ballot, &DocumentId::new("a")).await;
        assert!(matches!(result, Err(DomainError::Store(_))));
        assert_eq!(ballot.state(), BallotState::SelectingExhibit);

        store.set_unavailable(false).await;
        service
            .submit_vote(&mut ballot, &DocumentId::new("a"))
            .await
            .unwrap();
        assert_eq!(ballot.state(), BallotState::Confirmed);
        assert_eq!(store.count(REVIEWS).await, 1);
    }

    #[tokio::test]
    async fn test_counter_failure_still_confirms() {
        let store = seeded_store().await;
        let service = BallotService::new(store.clone());
        let mut ballot = reviewed_ballot();
        store.set_fail_on_increment(true).await;

        let receipt = service
            .submit_vote(&mut ballot, &DocumentId::new("a"))
            .await
            .unwrap();

        assert!(!receipt.counter_updated);
        assert_eq!(ballot.state(), BallotState::Confirmed);
        assert_eq!(store.count(REVIEWS).await, 1);
    }

    #[tokio::test]
    async fn test_vote_for_unlisted_exhibit_is_rejected() {
        let store = seeded_store().await;
        let service = BallotService::new(store.clone());
        let mut ballot = reviewed_ballot();

        let result = service
            .submit_vote(&mut ballot, &DocumentId::new("deleted"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Ballot(BallotError::UnknownExhibit(_)))
        ));
        assert_eq!(ballot.state(), BallotState::SelectingExhibit);
        assert_eq!(store.count(REVIEWS).await, 0);
    }
}
