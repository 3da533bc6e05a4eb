//! In-memory platform connector for tests.

use crate::traits::{
    AccountId, BiPlatformConnector, ConnectorError, ConnectorResult, ResetLink, RoleId,
    SessionToken,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Scriptable mock of the platform admin API. Records every call in
/// order and can be configured to fail any single operation.
#[derive(Default)]
pub struct MockPlatformConnector {
    calls: Mutex<Vec<String>>,
    created: Mutex<Option<CreatedAccount>>,
    role_assignments: Mutex<Vec<(AccountId, RoleId)>>,
    account_id: Option<AccountId>,
    reset_link: Option<String>,
    fail_authenticate: Option<ConnectorError>,
    fail_create_account: Option<ConnectorError>,
    fail_assign_role: Option<ConnectorError>,
    fail_reset_link: Option<ConnectorError>,
}

/// Arguments captured from the last `create_account` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl MockPlatformConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_reset_link(mut self, url: &str) -> Self {
        self.reset_link = Some(url.to_string());
        self
    }

    pub fn with_authenticate_failure(mut self, error: ConnectorError) -> Self {
        self.fail_authenticate = Some(error);
        self
    }

    pub fn with_create_account_failure(mut self, error: ConnectorError) -> Self {
        self.fail_create_account = Some(error);
        self
    }

    pub fn with_assign_role_failure(mut self, error: ConnectorError) -> Self {
        self.fail_assign_role = Some(error);
        self
    }

    pub fn with_reset_link_failure(mut self, error: ConnectorError) -> Self {
        self.fail_reset_link = Some(error);
        self
    }

    /// Names of the operations invoked so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of the last `create_account` call, if any.
    pub fn created_account(&self) -> Option<CreatedAccount> {
        self.created.lock().unwrap().clone()
    }

    /// All role assignments applied so far.
    pub fn role_assignments(&self) -> Vec<(AccountId, RoleId)> {
        self.role_assignments.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl BiPlatformConnector for MockPlatformConnector {
    fn name(&self) -> &str {
        "mock-platform"
    }

    async fn authenticate(&self) -> ConnectorResult<SessionToken> {
        self.record("authenticate");
        if let Some(e) = &self.fail_authenticate {
            return Err(e.clone());
        }
        Ok(SessionToken::new("mock-session-token".to_string()))
    }

    async fn create_account(
        &self,
        _session: &SessionToken,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> ConnectorResult<AccountId> {
        self.record("create_account");
        if let Some(e) = &self.fail_create_account {
            return Err(e.clone());
        }
        *self.created.lock().unwrap() = Some(CreatedAccount {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        });
        Ok(self.account_id.unwrap_or(AccountId(42)))
    }

    async fn assign_role(
        &self,
        _session: &SessionToken,
        account_id: AccountId,
        role_id: RoleId,
    ) -> ConnectorResult<()> {
        self.record("assign_role");
        if let Some(e) = &self.fail_assign_role {
            return Err(e.clone());
        }
        self.role_assignments
            .lock()
            .unwrap()
            .push((account_id, role_id));
        Ok(())
    }

    async fn request_password_reset_link(
        &self,
        _session: &SessionToken,
        _account_id: AccountId,
    ) -> ConnectorResult<ResetLink> {
        self.record("request_password_reset_link");
        if let Some(e) = &self.fail_reset_link {
            return Err(e.clone());
        }
        Ok(ResetLink::new(
            self.reset_link
                .clone()
                .unwrap_or_else(|| "https://bi.example.com/password/reset/mock".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let mock = MockPlatformConnector::new();
        let session = mock.authenticate().await.unwrap();
        let id = mock
            .create_account(&session, "Ada", "Lovelace", "ada@example.com")
            .await
            .unwrap();
        mock.assign_role(&session, id, RoleId(3)).await.unwrap();
        mock.request_password_reset_link(&session, id).await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "authenticate",
                "create_account",
                "assign_role",
                "request_password_reset_link"
            ]
        );
        assert_eq!(mock.role_assignments(), vec![(AccountId(42), RoleId(3))]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockPlatformConnector::new()
            .with_create_account_failure(ConnectorError::Rejected("duplicate email".into()));
        let session = mock.authenticate().await.unwrap();
        let result = mock
            .create_account(&session, "Ada", "Lovelace", "ada@example.com")
            .await;
        assert!(matches!(result, Err(ConnectorError::Rejected(_))));
        assert!(mock.created_account().is_none());
    }
}
