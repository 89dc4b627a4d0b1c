//! Domain layer for the expo voting service.
//!
//! This crate provides:
//! - Exhibit and Review records as they live in the record store
//! - Admin management services (exhibit CRUD with cascading delete, reviews)
//! - The ballot workflow: a review/vote wizard modelled as a state machine
//! - Admin authentication: credential verification and explicit sessions

pub mod auth;
pub mod ballot;
pub mod error;
pub mod exhibit;
pub mod review;

pub use auth::{
    AdminAccount, AdminSession, AuthError, CredentialVerifier, SessionManager, SessionToken,
    StaticCredentials,
};
pub use ballot::{Ballot, BallotError, BallotId, BallotService, BallotState, ReviewInput, VoteReceipt};
pub use error::DomainError;
pub use exhibit::{CascadeReport, Exhibit, ExhibitDraft, ExhibitError, ExhibitService};
pub use review::{NewReview, Rating, RatingError, Review, ReviewService};
