//! Connector trait definitions and shared types.
//!
//! The provisioning flow depends on two external systems: the analytics
//! platform's administrative API and a transactional email provider.
//! Each is reached through a trait defined here so the orchestrator can
//! be exercised against mock implementations.

use crate::secure_string::SecureString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rejected by remote API: {0}")]
    Rejected(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ConnectorError {
    /// Transient network faults that are safe to retry for idempotent
    /// calls. Rejections are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectorError::Timeout(_) | ConnectorError::ConnectionFailed(_)
        )
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Configuration shared by all HTTP-backed connectors.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Connector name, used in logs.
    pub name: String,
    /// Base URL for the remote API.
    pub base_url: String,
    /// Authentication applied to every request.
    pub auth: AuthConfig,
    /// Request timeout in seconds. A hung upstream call must never
    /// block a server worker indefinitely.
    pub timeout_secs: u64,
    /// Additional headers to include.
    pub headers: HashMap<String, String>,
}

/// Static authentication configuration.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// No static auth; the connector supplies credentials per call.
    None,
    /// API key sent in a custom header.
    ApiKey {
        key: SecureString,
        header_name: String,
    },
    /// Bearer token in the Authorization header.
    BearerToken { token: SecureString },
}

/// Short-lived session token obtained from the platform's login
/// endpoint. Scoped to a single provisioning run; never cached.
#[derive(Clone)]
pub struct SessionToken(SecureString);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(SecureString::new(token))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Platform-assigned identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub i64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-time password-setup URL issued by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetLink(String);

impl ResetLink {
    pub fn new(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative client for the analytics platform.
///
/// The three post-authentication calls are strictly ordered: the
/// account id produced by `create_account` is required input to
/// `assign_role` and `request_password_reset_link`.
#[async_trait]
pub trait BiPlatformConnector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;

    /// Exchanges static client credentials for a short-lived session
    /// token.
    async fn authenticate(&self) -> ConnectorResult<SessionToken>;

    /// Creates a user account plus its email credential record and
    /// returns the platform-assigned account id.
    async fn create_account(
        &self,
        session: &SessionToken,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> ConnectorResult<AccountId>;

    /// Sets the account's role list to exactly `[role_id]`, replacing
    /// any existing assignment.
    async fn assign_role(
        &self,
        session: &SessionToken,
        account_id: AccountId,
        role_id: RoleId,
    ) -> ConnectorResult<()>;

    /// Requests a one-time password-setup URL for the account.
    async fn request_password_reset_link(
        &self,
        session: &SessionToken,
        account_id: AccountId,
    ) -> ConnectorResult<ResetLink>;
}

/// A rendered plain-text email ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Transactional email provider.
#[async_trait]
pub trait EmailConnector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;

    /// Submits the welcome email carrying the password-setup link.
    async fn send_welcome_email(&self, message: &OutboundEmail) -> ConnectorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ConnectorError::Timeout("t".into()).is_transient());
        assert!(ConnectorError::ConnectionFailed("c".into()).is_transient());
        assert!(!ConnectorError::Rejected("duplicate email".into()).is_transient());
        assert!(!ConnectorError::AuthenticationFailed("bad creds".into()).is_transient());
    }

    #[test]
    fn test_session_token_debug_redacted() {
        let token = SessionToken::new("abc123".to_string());
        assert!(!format!("{:?}", token).contains("abc123"));
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(AccountId(42).to_string(), "42");
        assert_eq!(RoleId(7).to_string(), "7");
    }

    #[test]
    fn test_reset_link() {
        let link = ResetLink::new("https://bi.example.com/reset/xyz".to_string());
        assert_eq!(link.as_str(), "https://bi.example.com/reset/xyz");
        assert_eq!(link.to_string(), "https://bi.example.com/reset/xyz");
    }
}
