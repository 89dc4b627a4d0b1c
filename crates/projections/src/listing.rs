//! Reviews joined with the name of the exhibit they vote for.

use std::collections::HashMap;

use common::DocumentId;
use domain::{Exhibit, Review};
use serde::Serialize;

/// Label for reviews whose exhibit is missing or was deleted.
pub const UNKNOWN_EXHIBIT: &str = "Unknown Exhibit";

/// A review row in the admin review table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewListing {
    #[serde(flatten)]
    pub review: Review,
    #[serde(rename = "exhibitName")]
    pub exhibit_name: String,
}

/// Left-joins reviews to exhibit names, keeping review order.
pub fn join_reviews_with_exhibit_names(
    exhibits: &[Exhibit],
    reviews: &[Review],
) -> Vec<ReviewListing> {
    let names: HashMap<&DocumentId, &str> = exhibits
        .iter()
        .map(|exhibit| (&exhibit.id, exhibit.name.as_str()))
        .collect();

    reviews
        .iter()
        .map(|review| {
            let exhibit_name = review
                .selected_exhibit
                .as_ref()
                .and_then(|id| names.get(id).copied())
                .unwrap_or(UNKNOWN_EXHIBIT);
            ReviewListing {
                review: review.clone(),
                exhibit_name: exhibit_name.to_string(),
            }
        })
        .collect()
}

/// The reviews that vote for one exhibit, in input order.
pub fn reviews_for_exhibit(reviews: &[Review], exhibit_id: &DocumentId) -> Vec<Review> {
    reviews
        .iter()
        .filter(|review| review.is_for(exhibit_id))
        .cloned()
        .collect()
}
