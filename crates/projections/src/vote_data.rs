//! Per-exhibit vote counts and average ratings.

use std::collections::HashMap;

use common::DocumentId;
use domain::{Exhibit, Review};
use serde::Serialize;

use crate::decimal::one_decimal;

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteData {
    pub id: DocumentId,
    pub name: String,
    pub members: String,
    /// Number of reviews voting for this exhibit.
    pub votes: usize,
    /// Mean rating of those reviews, one decimal; `"0.0"` with no votes.
    pub average_rating: String,
    /// Number of ratings behind `average_rating`; always equals `votes`.
    pub total_ratings: usize,
}

#[derive(Default, Clone, Copy)]
struct Tally {
    votes: u64,
    rating_sum: u64,
}

/// Computes vote counts and average ratings for every exhibit.
///
/// Output follows the exhibit order. Reviews whose `selectedExhibit` is
/// absent or names no listed exhibit are not counted anywhere.
pub fn compute_vote_data(exhibits: &[Exhibit], reviews: &[Review]) -> Vec<VoteData> {
    let mut tallies: HashMap<&DocumentId, Tally> = HashMap::with_capacity(exhibits.len());
    for review in reviews {
        if let Some(exhibit_id) = &review.selected_exhibit {
            let tally = tallies.entry(exhibit_id).or_default();
            tally.votes += 1;
            tally.rating_sum += u64::from(review.rating.value());
        }
    }

    exhibits
        .iter()
        .map(|exhibit| {
            let tally = tallies.get(&exhibit.id).copied().unwrap_or_default();
            VoteData {
                id: exhibit.id.clone(),
                name: exhibit.name.clone(),
                members: exhibit.members_or_placeholder().to_string(),
                votes: tally.votes as usize,
                average_rating: one_decimal(tally.rating_sum, tally.votes),
                total_ratings: tally.votes as usize,
            }
        })
        .collect()
}

/// Mean rating across all reviews, one decimal; `"0.0"` with no reviews.
pub fn overall_average_rating(reviews: &[Review]) -> String {
    let sum: u64 = reviews
        .iter()
        .map(|review| u64::from(review.rating.value()))
        .sum();
    one_decimal(sum, reviews.len() as u64)
}
