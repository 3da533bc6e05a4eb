//! Looker admin API connector.
//!
//! Drives the four administrative calls the provisioning chain needs:
//! login, user creation (with the required email-credential sub-step),
//! role replacement, and password-reset-link issuance.

use crate::http::HttpClient;
use crate::secure_string::SecureString;
use crate::traits::{
    AccountId, BiPlatformConnector, ConnectorConfig, ConnectorError, ConnectorResult, ResetLink,
    RoleId, SessionToken,
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Looker connector configuration.
#[derive(Debug, Clone)]
pub struct LookerConfig {
    pub connector: ConnectorConfig,
    /// API client id exchanged at login.
    pub client_id: String,
    /// API client secret exchanged at login.
    pub client_secret: SecureString,
    /// Extra login attempts on timeout/connect failure. Login is the
    /// only call in the chain that is safe to repeat.
    pub auth_retries: u32,
}

/// Looker admin API connector.
pub struct LookerConnector {
    config: LookerConfig,
    client: HttpClient,
}

impl LookerConnector {
    pub fn new(config: LookerConfig) -> ConnectorResult<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(ConnectorError::ConfigError(
                "looker client id and secret must be set".into(),
            ));
        }
        let client = HttpClient::new(config.connector.clone())?;
        info!(
            base_url = %config.connector.base_url,
            "Looker connector initialized"
        );
        Ok(Self { config, client })
    }

    /// Looker expects `Authorization: token <access_token>` on every
    /// call after login.
    fn with_session(request: RequestBuilder, session: &SessionToken) -> RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("token {}", session.expose()),
        )
    }
}

#[async_trait]
impl BiPlatformConnector for LookerConnector {
    fn name(&self) -> &str {
        &self.config.connector.name
    }

    #[instrument(skip(self))]
    async fn authenticate(&self) -> ConnectorResult<SessionToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
        ];

        let mut attempt = 0;
        loop {
            let request = self.client.post("/login").form(&params);
            match self.client.execute_json::<AuthToken>(request).await {
                Ok(token) => return Ok(SessionToken::new(token.access_token)),
                Err(e) if e.is_transient() && attempt < self.config.auth_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "login failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    #[instrument(skip(self, session, first_name, last_name))]
    async fn create_account(
        &self,
        session: &SessionToken,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> ConnectorResult<AccountId> {
        let body = NewUser {
            first_name,
            last_name,
            email,
        };
        let request = Self::with_session(self.client.post("/users"), session).json(&body);
        let created: CreatedUser = self.client.execute_json(request).await?;
        let account_id = AccountId(created.id);

        // The account is unusable without an email credential record;
        // a failure here still leaves the bare account behind, so the
        // id is included for operator cleanup.
        let credential = EmailCredential { email };
        let request = Self::with_session(
            self.client.post(&format!("/users/{}/credentials_email", created.id)),
            session,
        )
        .json(&credential);
        self.client
            .execute(request)
            .await
            .map_err(|e| credential_step_error(account_id, e))?;

        info!(%account_id, "Looker account created");
        Ok(account_id)
    }

    #[instrument(skip(self, session))]
    async fn assign_role(
        &self,
        session: &SessionToken,
        account_id: AccountId,
        role_id: RoleId,
    ) -> ConnectorResult<()> {
        // PUT replaces the role list wholesale.
        let body = [role_id.0];
        let request = Self::with_session(
            self.client.put(&format!("/users/{}/roles", account_id.0)),
            session,
        )
        .json(&body);
        self.client.execute(request).await?;
        info!(%account_id, %role_id, "role assigned");
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn request_password_reset_link(
        &self,
        session: &SessionToken,
        account_id: AccountId,
    ) -> ConnectorResult<ResetLink> {
        let request = Self::with_session(
            self.client.post(&format!(
                "/users/{}/credentials_email/password_reset",
                account_id.0
            )),
            session,
        );
        let credential: CredentialsEmail = self.client.execute_json(request).await?;
        credential
            .password_reset_url
            .map(ResetLink::new)
            .ok_or_else(|| {
                ConnectorError::InvalidResponse(format!(
                    "no password_reset_url in response for account {}",
                    account_id
                ))
            })
    }
}

/// Adds the created account id to a credentials_email sub-step failure.
/// Transient faults keep their variant so they stay recognizable as
/// transient; everything else reads as a rejection of the sub-step.
fn credential_step_error(account_id: AccountId, error: ConnectorError) -> ConnectorError {
    let context = format!("email credential creation failed for account {}", account_id);
    match error {
        ConnectorError::Timeout(msg) => ConnectorError::Timeout(format!("{}: {}", context, msg)),
        ConnectorError::ConnectionFailed(msg) => {
            ConnectorError::ConnectionFailed(format!("{}: {}", context, msg))
        }
        other => ConnectorError::Rejected(format!("{}: {}", context, other)),
    }
}

#[derive(Debug, Deserialize)]
struct AuthToken {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct NewUser<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedUser {
    id: i64,
}

#[derive(Debug, Serialize)]
struct EmailCredential<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct CredentialsEmail {
    password_reset_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_connector_config;

    fn create_test_config() -> LookerConfig {
        LookerConfig {
            connector: test_connector_config("looker-test", "https://bi.example.com:19999/api/4.0"),
            client_id: "test-id".to_string(),
            client_secret: SecureString::from("test-secret"),
            auth_retries: 1,
        }
    }

    #[test]
    fn test_connector_creation() {
        assert!(LookerConnector::new(create_test_config()).is_ok());
    }

    #[test]
    fn test_connector_rejects_empty_credentials() {
        let mut config = create_test_config();
        config.client_id = String::new();
        assert!(matches!(
            LookerConnector::new(config),
            Err(ConnectorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_new_user_payload() {
        let body = NewUser {
            first_name: "Ada",
            last_name: "Lovelace",
            email: "ada@example.com",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com"
            })
        );
    }

    #[test]
    fn test_parse_created_user() {
        let created: CreatedUser = serde_json::from_str(r#"{"id": 123, "is_disabled": false}"#)
            .unwrap();
        assert_eq!(created.id, 123);
    }

    #[test]
    fn test_parse_reset_url() {
        let credential: CredentialsEmail = serde_json::from_str(
            r#"{"email": "ada@example.com", "password_reset_url": "https://bi.example.com/password/reset/abc"}"#,
        )
        .unwrap();
        assert_eq!(
            credential.password_reset_url.as_deref(),
            Some("https://bi.example.com/password/reset/abc")
        );
    }

    #[test]
    fn test_credential_step_error_keeps_transient_classification() {
        let e = credential_step_error(AccountId(7), ConnectorError::Timeout("deadline".into()));
        assert!(e.is_transient());
        assert!(e.to_string().contains("account 7"));

        let e = credential_step_error(
            AccountId(7),
            ConnectorError::ConnectionFailed("refused".into()),
        );
        assert!(e.is_transient());

        let e = credential_step_error(AccountId(7), ConnectorError::RequestFailed("500".into()));
        assert!(matches!(e, ConnectorError::Rejected(_)));
        assert!(!e.is_transient());
    }

    #[test]
    fn test_parse_reset_url_missing() {
        let credential: CredentialsEmail =
            serde_json::from_str(r#"{"email": "ada@example.com"}"#).unwrap();
        assert!(credential.password_reset_url.is_none());
    }
}
