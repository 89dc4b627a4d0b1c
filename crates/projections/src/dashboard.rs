//! The admin dashboard read model.

use std::time::Instant;

use chrono::{DateTime, Utc};
use domain::{Exhibit, Review};
use record_store::{EXHIBITS, REVIEWS, RecordStore, RecordStoreExt};
use serde::Serialize;

use crate::Result;
use crate::distribution::{RatingDistribution, compute_rating_distribution};
use crate::listing::{ReviewListing, join_reviews_with_exhibit_names};
use crate::summary::{Summary, summarize};
use crate::vote_data::{VoteData, compute_vote_data, overall_average_rating};

/// Everything the admin dashboard shows, derived from one snapshot of the
/// `exhibits` and `reviews` collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub exhibit_count: usize,
    pub review_count: usize,
    /// Mean rating over all reviews, one decimal.
    pub average_rating: String,
    pub vote_data: Vec<VoteData>,
    pub rating_distribution: RatingDistribution,
    pub summary: Summary,
    pub reviews: Vec<ReviewListing>,
    pub generated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Builds the dashboard from raw collections.
    pub fn build(exhibits: &[Exhibit], reviews: &[Review]) -> Self {
        Self::build_at(exhibits, reviews, Utc::now())
    }

    /// Builds the dashboard, stamping it with `now`.
    pub fn build_at(exhibits: &[Exhibit], reviews: &[Review], now: DateTime<Utc>) -> Self {
        let vote_data = compute_vote_data(exhibits, reviews);
        let rating_distribution = compute_rating_distribution(reviews);
        let summary = summarize(&vote_data, &rating_distribution);

        Self {
            exhibit_count: exhibits.len(),
            review_count: reviews.len(),
            average_rating: overall_average_rating(reviews),
            vote_data,
            rating_distribution,
            summary,
            reviews: join_reviews_with_exhibit_names(exhibits, reviews),
            generated_at: now,
        }
    }
}

/// Builds [`Dashboard`]s from a record store.
///
/// Every call re-fetches both collections in full; nothing is cached between
/// calls, so the result always reflects the latest writes.
pub struct DashboardProjector<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> DashboardProjector<S> {
    /// Creates a new projector over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetches exhibits and reviews and rebuilds the dashboard.
    #[tracing::instrument(skip(self))]
    pub async fn build(&self) -> Result<Dashboard> {
        let started = Instant::now();

        let (exhibits, reviews) = tokio::try_join!(
            self.store.list_decoded::<Exhibit>(EXHIBITS),
            self.store.list_decoded::<Review>(REVIEWS),
        )?;
        let dashboard = Dashboard::build(&exhibits, &reviews);

        metrics::histogram!("dashboard_build_seconds").record(started.elapsed().as_secs_f64());
        tracing::debug!(
            exhibits = dashboard.exhibit_count,
            reviews = dashboard.review_count,
            "dashboard rebuilt"
        );

        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use common::DocumentId;
    use record_store::{Document, InMemoryRecordStore};
    use serde_json::json;

    use super::*;
    use crate::fixtures::expo;
    use crate::summary::NOT_AVAILABLE;

    #[test]
    fn test_build_scenario() {
        let (exhibits, reviews) = expo();

        let dashboard = Dashboard::build(&exhibits, &reviews);

        assert_eq!(dashboard.exhibit_count, 2);
        assert_eq!(dashboard.review_count, 3);
        assert_eq!(dashboard.average_rating, "4.0");
        assert_eq!(dashboard.vote_data[0].votes, 2);
        assert_eq!(dashboard.rating_distribution.total, 3);
        assert_eq!(dashboard.summary.total_votes, 3);
        assert_eq!(dashboard.reviews.len(), 3);
    }

    #[test]
    fn test_build_is_idempotent() {
        let (exhibits, reviews) = expo();
        let now = Utc::now();
        assert_eq!(
            Dashboard::build_at(&exhibits, &reviews, now),
            Dashboard::build_at(&exhibits, &reviews, now)
        );
    }

    #[test]
    fn test_build_empty() {
        let dashboard = Dashboard::build(&[], &[]);
        assert_eq!(dashboard.average_rating, "0.0");
        assert!(dashboard.vote_data.is_empty());
        assert_eq!(dashboard.summary.most_voted_exhibit_name, NOT_AVAILABLE);
    }

    #[test]
    fn test_serializes_camel_case() {
        let (exhibits, reviews) = expo();
        let value = serde_json::to_value(Dashboard::build(&exhibits, &reviews)).unwrap();

        assert_eq!(value["reviewCount"], 3);
        assert_eq!(value["averageRating"], "4.0");
        assert_eq!(value["voteData"][0]["averageRating"], "4.0");
        assert_eq!(value["voteData"][0]["totalRatings"], 2);
        assert_eq!(value["summary"]["mostVotedExhibitName"], "Volcano");
        assert_eq!(value["summary"]["mostCommonRatingLabel"], "3 stars");
        assert_eq!(value["reviews"][0]["exhibitName"], "Volcano");
        assert!(value["generatedAt"].is_string());
        assert!(value.get("vote_data").is_none());
    }

    #[tokio::test]
    async fn test_projector_reads_store() {
        let store = InMemoryRecordStore::new();
        store
            .insert_with_id(
                EXHIBITS,
                DocumentId::new("a"),
                Document::fields_of(&json!({"name": "Volcano", "members": "Ana"})).unwrap(),
            )
            .await;
        for (rating, exhibit) in [(5, "a"), (2, "a"), (4, "gone")] {
            store
                .add(
                    REVIEWS,
                    Document::fields_of(&json!({
                        "name": "Ben",
                        "rating": rating,
                        "selectedExhibit": exhibit,
                    }))
                    .unwrap(),
                )
                .await
                .unwrap();
        }

        let dashboard = DashboardProjector::new(store).build().await.unwrap();

        assert_eq!(dashboard.review_count, 3);
        assert_eq!(dashboard.vote_data[0].votes, 2);
        assert_eq!(dashboard.vote_data[0].average_rating, "3.5");
        assert_eq!(dashboard.reviews[2].exhibit_name, "Unknown Exhibit");
    }

    #[tokio::test]
    async fn test_projector_skips_malformed_reviews() {
        let store = InMemoryRecordStore::new();
        for rating in [4, 9] {
            store
                .add(REVIEWS, Document::fields_of(&json!({"rating": rating})).unwrap())
                .await
                .unwrap();
        }

        let dashboard = DashboardProjector::new(store).build().await.unwrap();
        assert_eq!(dashboard.review_count, 1);
    }

    #[tokio::test]
    async fn test_projector_surfaces_store_failure() {
        let store = InMemoryRecordStore::new();
        store.set_unavailable(true).await;

        let result = DashboardProjector::new(store).build().await;
        assert!(result.unwrap_err().is_unavailable());
    }
}
