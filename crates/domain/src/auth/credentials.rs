//! Credential verification.

use super::AuthError;

/// Decides whether a username/password pair may administer the expo.
pub trait CredentialVerifier: Send + Sync {
    /// Returns true if the credentials are accepted.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// One allow-listed admin account.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl AdminAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fixed allow-list of admin accounts.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    accounts: Vec<AdminAccount>,
}

impl StaticCredentials {
    /// Creates an allow-list from accounts.
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        Self { accounts }
    }

    /// Parses `user:password` pairs separated by commas.
    ///
    /// Blank entries are ignored; the password may itself contain colons.
    pub fn parse(list: &str) -> Result<Self, AuthError> {
        let mut accounts = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (username, password) = entry
                .split_once(':')
                .filter(|(u, p)| !u.trim().is_empty() && !p.is_empty())
                .ok_or_else(|| {
                    let username = entry.split(':').next().unwrap_or_default();
                    AuthError::MalformedAccount(username.to_string())
                })?;
            accounts.push(AdminAccount::new(username.trim(), password));
        }
        Ok(Self { accounts })
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns the allow-listed usernames.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|a| a.username.as_str())
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.username == username && a.password == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_exact_match_only() {
        let creds = StaticCredentials::new(vec![AdminAccount::new("judge", "s3cret")]);
        assert!(creds.verify("judge", "s3cret"));
        assert!(!creds.verify("judge", "S3cret"));
        assert!(!creds.verify("Judge", "s3cret"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn parse_pairs() {
        let creds = StaticCredentials::parse(" judge:one , host:two:with:colons ,").unwrap();
        assert_eq!(creds.len(), 2);
        assert!(creds.verify("judge", "one"));
        assert!(creds.verify("host", "two:with:colons"));
    }

    #[test]
    fn parse_empty_is_empty() {
        assert!(StaticCredentials::parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_entries_without_password() {
        assert_eq!(
            StaticCredentials::parse("judge").unwrap_err(),
            AuthError::MalformedAccount("judge".to_string())
        );
        assert!(StaticCredentials::parse("judge:").is_err());
        assert!(StaticCredentials::parse(":pw").is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", AdminAccount::new("judge", "s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
