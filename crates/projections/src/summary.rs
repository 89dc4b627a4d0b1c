//! Headline figures for the dashboard cards.

use serde::Serialize;

use crate::decimal::one_decimal;
use crate::distribution::RatingDistribution;
use crate::vote_data::VoteData;

/// Shown when there is nothing to summarise.
pub const NOT_AVAILABLE: &str = "N/A";

/// Dashboard headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// First exhibit with the most votes; `"N/A"` with no exhibits.
    pub most_voted_exhibit_name: String,
    pub total_votes: usize,
    /// Votes per exhibit, one decimal; `"0.0"` with no exhibits.
    pub avg_votes_per_exhibit: String,
    /// e.g. `"5 stars"`; `"N/A"` with no reviews.
    pub most_common_rating_label: String,
}

/// Condenses the vote table and rating histogram into headline figures.
pub fn summarize(vote_data: &[VoteData], distribution: &RatingDistribution) -> Summary {
    let mut most_voted: Option<&VoteData> = None;
    for row in vote_data {
        if most_voted.is_none_or(|best| row.votes > best.votes) {
            most_voted = Some(row);
        }
    }

    let total_votes: usize = vote_data.iter().map(|row| row.votes).sum();

    let most_common_rating_label = match distribution.most_common() {
        Some(rating) if rating.value() == 1 => "1 star".to_string(),
        Some(rating) => format!("{rating} stars"),
        None => NOT_AVAILABLE.to_string(),
    };

    Summary {
        most_voted_exhibit_name: most_voted
            .map_or(NOT_AVAILABLE, |row| row.name.as_str())
            .to_string(),
        total_votes,
        avg_votes_per_exhibit: one_decimal(total_votes as u64, vote_data.len() as u64),
        most_common_rating_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::compute_rating_distribution;
    use crate::fixtures::{expo, review};
    use crate::vote_data::compute_vote_data;
    use domain::Exhibit;

    #[test]
    fn test_scenario_summary() {
        let (exhibits, reviews) = expo();
        let summary = summarize(
            &compute_vote_data(&exhibits, &reviews),
            &compute_rating_distribution(&reviews),
        );

        assert_eq!(summary.most_voted_exhibit_name, "Volcano");
        assert_eq!(summary.total_votes, 3);
        assert_eq!(summary.avg_votes_per_exhibit, "1.5");
        // 3, 4 and 5 are tied; the lowest comes first.
        assert_eq!(summary.most_common_rating_label, "3 stars");
    }

    #[test]
    fn test_empty_inputs_degrade() {
        let summary = summarize(&[], &compute_rating_distribution(&[]));
        assert_eq!(summary.most_voted_exhibit_name, NOT_AVAILABLE);
        assert_eq!(summary.total_votes, 0);
        assert_eq!(summary.avg_votes_per_exhibit, "0.0");
        assert_eq!(summary.most_common_rating_label, NOT_AVAILABLE);
    }

    #[test]
    fn test_exhibits_without_votes() {
        let (exhibits, _) = expo();
        let summary = summarize(
            &compute_vote_data(&exhibits, &[]),
            &compute_rating_distribution(&[]),
        );
        assert_eq!(summary.most_voted_exhibit_name, "Volcano");
        assert_eq!(summary.avg_votes_per_exhibit, "0.0");
        assert_eq!(summary.most_common_rating_label, NOT_AVAILABLE);
    }

    #[test]
    fn test_most_voted_takes_first_maximum() {
        let exhibits = vec![
            Exhibit::new("a", "Volcano", "Ana"),
            Exhibit::new("b", "Battery", "Ben"),
            Exhibit::new("c", "Crystals", "Cy"),
        ];
        let reviews = vec![
            review("r1", 1, Some("b")),
            review("r2", 1, Some("c")),
            review("r3", 5, Some("c")),
            review("r4", 5, Some("b")),
        ];
        let summary = summarize(
            &compute_vote_data(&exhibits, &reviews),
            &compute_rating_distribution(&reviews),
        );

        assert_eq!(summary.most_voted_exhibit_name, "Battery");
        assert_eq!(summary.avg_votes_per_exhibit, "1.3");
        assert_eq!(summary.most_common_rating_label, "1 star");
    }
}
