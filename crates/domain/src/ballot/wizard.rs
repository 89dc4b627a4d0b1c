//! The ballot itself: the data an attendee enters, step by step.

use chrono::{DateTime, Utc};
use common::DocumentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exhibit::Exhibit;
use crate::review::{NewReview, Rating, RatingError};

use super::{BallotError, BallotState};

/// Unique identifier for a ballot in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallotId(Uuid);

impl BallotId {
    /// Creates a new random ballot ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ballot ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BallotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BallotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw review form input, as typed by the attendee.
///
/// A rating of 0 means "no star clicked yet". The rating is taken as any
/// integer so out-of-range values reach validation instead of failing to
/// decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub rating: i64,
}

impl ReviewInput {
    /// Creates form input with no review text.
    pub fn new(name: impl Into<String>, rating: impl Into<i64>) -> Self {
        Self {
            name: name.into(),
            review: None,
            rating: rating.into(),
        }
    }

    /// Adds review text.
    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.review = Some(review.into());
        self
    }
}

/// A validated review, held by the ballot until the vote is cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub name: String,
    pub review: String,
    pub rating: Rating,
}

/// One run through the review-then-vote wizard.
#[derive(Debug, Clone)]
pub struct Ballot {
    id: BallotId,
    state: BallotState,
    draft: Option<ReviewDraft>,
    selected_exhibit: Option<DocumentId>,
    review_id: Option<DocumentId>,
    created_at: DateTime<Utc>,
}

impl Default for Ballot {
    fn default() -> Self {
        Self::new()
    }
}

impl Ballot {
    /// Starts a fresh ballot on the review form.
    pub fn new() -> Self {
        Self {
            id: BallotId::new(),
            state: BallotState::default(),
            draft: None,
            selected_exhibit: None,
            review_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> BallotId {
        self.id
    }

    pub fn state(&self) -> BallotState {
        self.state
    }

    /// The accepted review, once the first step has been completed.
    pub fn draft(&self) -> Option<&ReviewDraft> {
        self.draft.as_ref()
    }

    /// The exhibit voted for, once confirmed.
    pub fn selected_exhibit(&self) -> Option<&DocumentId> {
        self.selected_exhibit.as_ref()
    }

    /// The stored review, once confirmed.
    pub fn review_id(&self) -> Option<&DocumentId> {
        self.review_id.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Accepts the review form and moves on to exhibit selection.
    ///
    /// The name must be non-blank and a rating between 1 and 5 must be
    /// chosen; the review text is optional. On error nothing changes.
    pub fn submit_review(&mut self, input: ReviewInput) -> Result<&ReviewDraft, BallotError> {
        if !self.state.can_submit_review() {
            return Err(self.invalid("submit review"));
        }

        let name = input.name.trim();
        if name.is_empty() {
            return Err(BallotError::NameRequired);
        }
        if input.rating == 0 {
            return Err(BallotError::RatingRequired);
        }
        let rating = u8::try_from(input.rating)
            .map_err(|_| RatingError(input.rating))
            .and_then(Rating::new)?;

        self.state = BallotState::SelectingExhibit;
        Ok(self.draft.insert(ReviewDraft {
            name: name.to_string(),
            review: input.review.unwrap_or_default().trim().to_string(),
            rating,
        }))
    }

    /// Returns to the review form, keeping what was entered.
    pub fn back(&mut self) -> Result<(), BallotError> {
        if !self.state.can_go_back() {
            return Err(self.invalid("go back"));
        }
        self.state = BallotState::CollectingReview;
        Ok(())
    }

    /// Builds the review record for a vote on `exhibit_id`.
    ///
    /// The exhibit must be one of `listed`. Does not change the ballot; call
    /// [`Ballot::confirm`] once the review has been stored.
    pub fn prepare_vote(
        &self,
        exhibit_id: &DocumentId,
        listed: &[Exhibit],
        now: DateTime<Utc>,
    ) -> Result<NewReview, BallotError> {
        if !self.state.can_vote() {
            return Err(self.invalid("vote"));
        }
        if exhibit_id.is_blank() {
            return Err(BallotError::ExhibitRequired);
        }
        if !listed.iter().any(|exhibit| &exhibit.id == exhibit_id) {
            return Err(BallotError::UnknownExhibit(exhibit_id.clone()));
        }
        let draft = self.draft.as_ref().ok_or_else(|| self.invalid("vote"))?;

        Ok(NewReview {
            name: draft.name.clone(),
            review: draft.review.clone(),
            rating: draft.rating,
            selected_exhibit: exhibit_id.clone(),
            timestamp: now,
        })
    }

    /// Marks the vote as cast.
    pub fn confirm(&mut self, exhibit_id: DocumentId, review_id: DocumentId) -> Result<(), BallotError> {
        if !self.state.can_vote() {
            return Err(self.invalid("confirm"));
        }
        self.selected_exhibit = Some(exhibit_id);
        self.review_id = Some(review_id);
        self.state = BallotState::Confirmed;
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> BallotError {
        BallotError::InvalidTransition {
            current_state: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exhibits() -> Vec<Exhibit> {
        vec![
            Exhibit::new("a", "Volcano", "Ana"),
            Exhibit::new("b", "Battery", "Ben"),
        ]
    }

    fn reviewed() -> Ballot {
        let mut ballot = Ballot::new();
        ballot
            .submit_review(ReviewInput::new("Ana", 4).with_review("Fizzy"))
            .unwrap();
        ballot
    }

    #[test]
    fn test_empty_name_never_advances() {
        let mut ballot = Ballot::new();
        for name in ["", "   ", "\t\n"] {
            let result = ballot.submit_review(ReviewInput::new(name, 5));
            assert!(matches!(result, Err(BallotError::NameRequired)));
            assert_eq!(ballot.state(), BallotState::CollectingReview);
            assert!(ballot.draft().is_none());
        }
    }

    #[test]
    fn test_missing_rating_never_advances() {
        let mut ballot = Ballot::new();
        let result = ballot.submit_review(ReviewInput::new("Ana", 0));
        assert!(matches!(result, Err(BallotError::RatingRequired)));
        assert_eq!(ballot.state(), BallotState::CollectingReview);
    }

    #[test]
    fn test_out_of_range_rating_never_advances() {
        let mut ballot = Ballot::new();
        let result = ballot.submit_review(ReviewInput::new("Ana", 6));
        assert!(matches!(result, Err(BallotError::InvalidRating(_))));
        assert_eq!(ballot.state(), BallotState::CollectingReview);
    }

    #[test]
    fn test_rating_outside_byte_range_never_advances() {
        let mut ballot = Ballot::new();
        for rating in [-1, 300, i64::MAX] {
            let result = ballot.submit_review(ReviewInput::new("Ana", rating));
            assert!(matches!(
                result,
                Err(BallotError::InvalidRating(RatingError(value))) if value == rating
            ));
            assert_eq!(ballot.state(), BallotState::CollectingReview);
        }
    }

    #[test]
    fn test_valid_review_advances_exactly_once() {
        let mut ballot = Ballot::new();

        let draft = ballot
            .submit_review(ReviewInput::new("  Ana ", 4))
            .unwrap()
            .clone();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.review, "");
        assert_eq!(ballot.state(), BallotState::SelectingExhibit);

        let again = ballot.submit_review(ReviewInput::new("Ana", 4));
        assert!(matches!(
            again,
            Err(BallotError::InvalidTransition {
                current_state: BallotState::SelectingExhibit,
                ..
            })
        ));
        assert_eq!(ballot.state(), BallotState::SelectingExhibit);
    }

    #[test]
    fn test_back_keeps_draft() {
        let mut ballot = reviewed();

        ballot.back().unwrap();
        assert_eq!(ballot.state(), BallotState::CollectingReview);
        assert_eq!(ballot.draft().unwrap().review, "Fizzy");

        assert!(ballot.back().is_err());
    }

    #[test]
    fn test_prepare_vote_requires_exhibit() {
        let ballot = reviewed();
        let result = ballot.prepare_vote(&DocumentId::new(""), &exhibits(), Utc::now());
        assert!(matches!(result, Err(BallotError::ExhibitRequired)));
    }

    #[test]
    fn test_prepare_vote_rejects_unlisted_exhibit() {
        let ballot = reviewed();
        let result = ballot.prepare_vote(&DocumentId::new("zz"), &exhibits(), Utc::now());
        assert!(matches!(result, Err(BallotError::UnknownExhibit(_))));
    }

    #[test]
    fn test_prepare_vote_before_review() {
        let ballot = Ballot::new();
        let result = ballot.prepare_vote(&DocumentId::new("a"), &exhibits(), Utc::now());
        assert!(matches!(result, Err(BallotError::InvalidTransition { .. })));
    }

    #[test]
    fn test_prepare_and_confirm_vote() {
        let mut ballot = reviewed();
        let now = Utc::now();

        let review = ballot
            .prepare_vote(&DocumentId::new("b"), &exhibits(), now)
            .unwrap();
        assert_eq!(review.name, "Ana");
        assert_eq!(review.review, "Fizzy");
        assert_eq!(review.rating.value(), 4);
        assert_eq!(review.selected_exhibit, DocumentId::new("b"));
        assert_eq!(review.timestamp, now);
        assert_eq!(ballot.state(), BallotState::SelectingExhibit);

        ballot
            .confirm(DocumentId::new("b"), DocumentId::new("r1"))
            .unwrap();
        assert_eq!(ballot.state(), BallotState::Confirmed);
        assert_eq!(ballot.review_id(), Some(&DocumentId::new("r1")));
    }

    #[test]
    fn test_confirmed_is_terminal() {
        let mut ballot = reviewed();
        ballot
            .confirm(DocumentId::new("a"), DocumentId::new("r1"))
            .unwrap();

        assert!(ballot.submit_review(ReviewInput::new("Ana", 3)).is_err());
        assert!(ballot.back().is_err());
        assert!(
            ballot
                .prepare_vote(&DocumentId::new("a"), &exhibits(), Utc::now())
                .is_err()
        );
        assert!(
            ballot
                .confirm(DocumentId::new("a"), DocumentId::new("r2"))
                .is_err()
        );
        assert_eq!(ballot.review_id(), Some(&DocumentId::new("r1")));
    }
}
