//! Admin authentication: an allow-list of credentials and explicit sessions.

mod credentials;
mod session;

pub use credentials::{AdminAccount, CredentialVerifier, StaticCredentials};
pub use session::{AdminSession, SessionManager, SessionToken};

use thiserror::Error;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Username/password pair is not on the allow-list.
    #[error("Access denied: invalid admin credentials")]
    InvalidCredentials,

    /// Token is unknown or was logged out.
    #[error("Invalid or missing admin session")]
    InvalidSession,

    /// Token was valid but has expired.
    #[error("Admin session expired")]
    SessionExpired,

    /// The configured credential list could not be parsed.
    #[error("Malformed admin account entry: {0}")]
    MalformedAccount(String),
}
