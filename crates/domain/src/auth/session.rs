//! Admin sessions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthError, CredentialVerifier};

/// Opaque bearer token identifying an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mints a fresh unguessable token.
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub token: SessionToken,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Returns true if the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues, validates and revokes admin sessions.
///
/// Sessions live in memory and expire after a fixed time-to-live.
pub struct SessionManager<V: CredentialVerifier> {
    verifier: V,
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionToken, AdminSession>>>,
}

impl<V: CredentialVerifier> SessionManager<V> {
    /// Creates a session manager issuing sessions valid for `ttl`.
    ///
    /// A negative `ttl` is treated as zero.
    pub fn new(verifier: V, ttl: Duration) -> Self {
        Self {
            verifier,
            ttl: ttl.max(Duration::zero()),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the session time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Verifies credentials and opens a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession, AuthError> {
        self.login_at(username, password, Utc::now()).await
    }

    /// Verifies credentials and opens a session issued at `now`.
    pub async fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        if !self.verifier.verify(username, password) {
            metrics::counter!("admin_login_failures_total").increment(1);
            tracing::warn!(username, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AdminSession {
            token: SessionToken::generate(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        metrics::counter!("admin_logins_total").increment(1);
        tracing::info!(username, expires_at = %session.expires_at, "admin logged in");
        Ok(session)
    }

    /// Looks up a live session.
    pub async fn validate(&self, token: &SessionToken) -> Result<AdminSession, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Looks up a session that is live at `now`; expired sessions are dropped.
    pub async fn validate_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired_at(now) {
            self.sessions.write().await.remove(token);
            return Err(AuthError::SessionExpired);
        }
        Ok(session)
    }

    /// Ends a session. Returns false if there was none.
    pub async fn logout(&self, token: &SessionToken) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            tracing::info!(username = %session.username, "admin logged out");
        }
        removed.is_some()
    }

    /// Drops every session expired at `now`, returning how many were dropped.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    /// Returns the number of open sessions.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
