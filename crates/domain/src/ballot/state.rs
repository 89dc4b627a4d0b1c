//! Ballot state machine.

use serde::{Deserialize, Serialize};

/// The step a ballot is on.
///
/// State transitions:
/// ```text
/// CollectingReview ──submit_review──► SelectingExhibit ──vote──► Confirmed
///        ▲                                  │
///        └──────────────back────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BallotState {
    /// Reviewer identity and rating are being entered.
    #[default]
    CollectingReview,

    /// Review accepted, waiting for an exhibit to be picked.
    SelectingExhibit,

    /// Review stored and vote cast (terminal state).
    Confirmed,
}

impl BallotState {
    /// Returns true if a review can be submitted in this state.
    pub fn can_submit_review(&self) -> bool {
        matches!(self, BallotState::CollectingReview)
    }

    /// Returns true if the ballot can step back to the review form.
    pub fn can_go_back(&self) -> bool {
        matches!(self, BallotState::SelectingExhibit)
    }

    /// Returns true if a vote can be cast in this state.
    pub fn can_vote(&self) -> bool {
        matches!(self, BallotState::SelectingExhibit)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, BallotState::Confirmed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BallotState::CollectingReview => "CollectingReview",
            BallotState::SelectingExhibit => "SelectingExhibit",
            BallotState::Confirmed => "Confirmed",
        }
    }
}

impl std::fmt::Display for BallotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
