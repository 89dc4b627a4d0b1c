//! How the star ratings are spread across the 1..=5 scale.

use domain::{Rating, Review};
use serde::Serialize;

use crate::decimal::tenths;

/// Count and share of one star value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: Rating,
    pub count: usize,
    /// Share of all reviews, in percent, rounded to one decimal.
    pub percentage: f64,
}

/// The rating histogram. Always holds one bucket per star value, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDistribution {
    pub total: usize,
    pub buckets: Vec<RatingBucket>,
}

impl RatingDistribution {
    /// Returns the bucket for one star value.
    pub fn bucket(&self, rating: Rating) -> Option<&RatingBucket> {
        self.buckets.iter().find(|bucket| bucket.rating == rating)
    }

    /// Returns the count for one star value.
    pub fn count(&self, rating: Rating) -> usize {
        self.bucket(rating).map_or(0, |bucket| bucket.count)
    }

    /// The most frequent rating, lowest first on ties. None with no reviews.
    pub fn most_common(&self) -> Option<Rating> {
        let mut best: Option<&RatingBucket> = None;
        for bucket in &self.buckets {
            if bucket.count > best.map_or(0, |b| b.count) {
                best = Some(bucket);
            }
        }
        best.map(|bucket| bucket.rating)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Buckets reviews by rating.
///
/// With no reviews every bucket has a count and percentage of 0.
pub fn compute_rating_distribution(reviews: &[Review]) -> RatingDistribution {
    let mut counts = [0usize; Rating::MAX as usize];
    for review in reviews {
        counts[usize::from(review.rating.value() - Rating::MIN)] += 1;
    }

    let total = reviews.len();
    let buckets = Rating::all()
        .zip(counts)
        .map(|(rating, count)| RatingBucket {
            rating,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    RatingDistribution { total, buckets }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    tenths(count as u64 * 100, total as u64) as f64 / 10.0
}
