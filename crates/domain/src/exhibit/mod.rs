//! Exhibits: the science-fair entries attendees vote for.

mod service;

pub use service::{CascadeReport, ExhibitService};

use common::DocumentId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document field holding the denormalised vote counter.
pub const VOTES_FIELD: &str = "votes";

/// Errors that can occur during exhibit operations.
#[derive(Debug, Error)]
pub enum ExhibitError {
    /// Exhibit title is required.
    #[error("Exhibit name is required")]
    NameRequired,

    /// Team members are required.
    #[error("Exhibit members are required")]
    MembersRequired,

    /// Exhibit does not exist.
    #[error("Exhibit not found: {0}")]
    NotFound(DocumentId),
}

/// An exhibit as stored in the `exhibits` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhibit {
    pub id: DocumentId,
    pub name: String,
    /// Free-text team description. Older documents used `teamMembers`.
    #[serde(default, alias = "teamMembers")]
    pub members: String,
    /// Counter bumped on every vote. Results never read it; they are
    /// recomputed from the reviews.
    #[serde(default)]
    pub votes: i64,
}

impl Exhibit {
    /// Creates an exhibit record with no recorded votes.
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>, members: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: members.into(),
            votes: 0,
        }
    }

    /// Returns the team description, or a placeholder when none was recorded.
    pub fn members_or_placeholder(&self) -> &str {
        if self.members.trim().is_empty() {
            "Team info unavailable"
        } else {
            &self.members
        }
    }
}

/// The admin-editable fields of an exhibit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitDraft {
    pub name: String,
    pub members: String,
}

impl ExhibitDraft {
    /// Creates a draft, trimming surrounding whitespace.
    pub fn new(name: impl Into<String>, members: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            members: members.into().trim().to_string(),
        }
    }

    /// Checks that both fields are present.
    pub fn validate(&self) -> Result<(), ExhibitError> {
        if self.name.trim().is_empty() {
            return Err(ExhibitError::NameRequired);
        }
        if self.members.trim().is_empty() {
            return Err(ExhibitError::MembersRequired);
        }
        Ok(())
    }
}
