//! Read-side aggregation for the expo admin screens.
//!
//! Every figure shown to admins is recomputed from the raw `exhibits` and
//! `reviews` collections:
//! - [`compute_vote_data`] for per-exhibit vote counts and average ratings
//! - [`compute_rating_distribution`] for the 1..=5 star histogram
//! - [`join_reviews_with_exhibit_names`] for the review table
//! - [`summarize`] for the headline cards
//! - [`Dashboard`] bundling all of the above, and [`DashboardProjector`] to
//!   build it from a store
//! - [`Report`] for the paginated plain-text export

pub mod dashboard;
pub mod distribution;
pub mod error;
pub mod listing;
pub mod report;
pub mod summary;
pub mod vote_data;

mod decimal;

pub use dashboard::{Dashboard, DashboardProjector};
pub use distribution::{RatingBucket, RatingDistribution, compute_rating_distribution};
pub use error::{ProjectionError, Result};
pub use listing::{
    ReviewListing, UNKNOWN_EXHIBIT, join_reviews_with_exhibit_names, reviews_for_exhibit,
};
pub use report::{Page, Report, ReportOptions};
pub use summary::{NOT_AVAILABLE, Summary, summarize};
pub use vote_data::{VoteData, compute_vote_data, overall_average_rating};

#[cfg(test)]
mod fixtures;
