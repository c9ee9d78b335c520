//! Identity validation collaborator

use crate::config::{AuthMethod, ClientConfig};
use crate::error::ConfigValidationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Validates an assembled configuration against the identity service
///
/// Called exactly once per provider instantiation. Implementations may
/// perform network I/O; no retry is expected.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    /// Returns the validator name (e.g., "iam")
    fn name(&self) -> &str;

    /// Check the configuration and open an authenticated session
    async fn validate(&self, config: &ClientConfig) -> Result<Session, ConfigValidationError>;
}

/// Outcome of a successful validation
#[derive(Debug)]
pub struct Session {
    pub auth_method: AuthMethod,

    /// Project the tenant name resolved to, if the service reported it
    pub project_id: Option<String>,

    /// Scoped token (password authentication only)
    pub token: Option<SecretString>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(auth_method: AuthMethod) -> Self {
        Self {
            auth_method,
            project_id: None,
            token: None,
            expires_at: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the token is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}
