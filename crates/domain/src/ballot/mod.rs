//! The ballot workflow: an attendee reviews the expo, then votes for one exhibit.

mod service;
mod state;
mod wizard;

pub use service::{BallotService, VoteReceipt};
pub use state::BallotState;
pub use wizard::{Ballot, BallotId, ReviewDraft, ReviewInput};

use common::DocumentId;
use thiserror::Error;

use crate::review::RatingError;

/// Errors that can occur while filling in a ballot.
///
/// Validation errors leave the ballot exactly as it was.
#[derive(Debug, Error)]
pub enum BallotError {
    /// Reviewer name is missing.
    #[error("Please enter your name before proceeding")]
    NameRequired,

    /// No rating was chosen.
    #[error("Please rate the Chemistry Expo before continuing")]
    RatingRequired,

    /// Rating is outside the star scale.
    #[error(transparent)]
    InvalidRating(#[from] RatingError),

    /// No exhibit was chosen.
    #[error("Please select an exhibit before submitting your vote")]
    ExhibitRequired,

    /// The chosen exhibit is not currently listed.
    #[error("Exhibit {0} is not available for voting")]
    UnknownExhibit(DocumentId),

    /// The ballot is not in the expected state.
    #[error("Invalid ballot transition: cannot {action} from {current_state} state")]
    InvalidTransition {
        current_state: BallotState,
        action: &'static str,
    },
}
