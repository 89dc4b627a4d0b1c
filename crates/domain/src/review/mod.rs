//! Reviews: one attendee's rating and comment, tied to the exhibit they voted for.

mod service;

pub use service::ReviewService;

use chrono::{DateTime, Utc};
use common::DocumentId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document field referencing the exhibit a review votes for.
pub const SELECTED_EXHIBIT_FIELD: &str = "selectedExhibit";

/// Name shown for reviewers who left none.
pub const ANONYMOUS: &str = "Anonymous";

/// A rating outside the 1..=5 star scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid rating: {0} (must be between 1 and 5)")]
pub struct RatingError(pub i64);

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating.
    pub const MIN: u8 = 1;

    /// Highest rating.
    pub const MAX: u8 = 5;

    /// Creates a rating, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError(i64::from(value)))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Every rating on the scale, lowest first.
    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }

    /// Renders the rating as filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

/// A review as stored in the `reviews` collection.
///
/// Decoding is lenient about optional fields so that older or hand-edited
/// documents still load: a missing name becomes `"Anonymous"`, missing text
/// becomes empty, and the exhibit reference and timestamp may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: DocumentId,
    #[serde(default = "anonymous")]
    pub name: String,
    #[serde(default)]
    pub review: String,
    pub rating: Rating,
    #[serde(rename = "selectedExhibit", default)]
    pub selected_exhibit: Option<DocumentId>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Review {
    /// Returns the reviewer name, falling back to `"Anonymous"` when blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            ANONYMOUS
        } else {
            &self.name
        }
    }

    /// Returns true if this review votes for the given exhibit.
    pub fn is_for(&self, exhibit_id: &DocumentId) -> bool {
        self.selected_exhibit.as_ref() == Some(exhibit_id)
    }
}

/// The fields written when a ballot is cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub name: String,
    pub review: String,
    pub rating: Rating,
    #[serde(rename = "selectedExhibit")]
    pub selected_exhibit: DocumentId,
    pub timestamp: DateTime<Utc>,
}

impl NewReview {
    /// Converts into the stored form once the store has assigned an id.
    pub fn into_review(self, id: DocumentId) -> Review {
        Review {
            id,
            name: self.name,
            review: self.review,
            rating: self.rating,
            selected_exhibit: Some(self.selected_exhibit),
            timestamp: Some(self.timestamp),
        }
    }
}
