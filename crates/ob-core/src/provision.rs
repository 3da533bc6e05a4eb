//! Provisioning orchestrator.
//!
//! Sequences the five dependent calls for one new user:
//! authenticate, create account, assign role, request reset link,
//! send welcome email. The chain stops at the first failure and the
//! failing stage is reported; a partially provisioned account is an
//! operator-visible outcome, never a silent one.

use crate::request::ProvisioningRequest;
use crate::settings::ProvisioningSettings;
use ob_connectors::{
    AccountId, BiPlatformConnector, ConnectorError, EmailConnector,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Stages of a provisioning run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticating,
    CreatingAccount,
    AssigningRole,
    RequestingResetLink,
    SendingEmail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Authenticating => "AUTHENTICATING",
            Stage::CreatingAccount => "CREATING_ACCOUNT",
            Stage::AssigningRole => "ASSIGNING_ROLE",
            Stage::RequestingResetLink => "REQUESTING_RESET_LINK",
            Stage::SendingEmail => "SENDING_EMAIL",
        };
        f.write_str(s)
    }
}

/// A failed provisioning run. Every variant after `Validation` carries
/// the underlying connector error; the variants that fire after account
/// creation also carry the account id so an operator can finish the
/// remaining steps by hand.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("invalid provisioning request: {0}")]
    Validation(String),

    #[error("platform authentication failed: {source}")]
    Authentication {
        #[source]
        source: ConnectorError,
    },

    #[error("account creation failed for {email}: {source}")]
    AccountCreation {
        email: String,
        #[source]
        source: ConnectorError,
    },

    #[error("role assignment failed for account {account_id}: {source}")]
    RoleAssignment {
        account_id: AccountId,
        #[source]
        source: ConnectorError,
    },

    #[error("password reset link request failed for account {account_id}: {source}")]
    ResetLink {
        account_id: AccountId,
        #[source]
        source: ConnectorError,
    },

    #[error("welcome email delivery failed for account {account_id}: {source}")]
    EmailDelivery {
        account_id: AccountId,
        #[source]
        source: ConnectorError,
    },
}

impl ProvisionError {
    /// The stage that failed, if a remote call was reached.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ProvisionError::Validation(_) => None,
            ProvisionError::Authentication { .. } => Some(Stage::Authenticating),
            ProvisionError::AccountCreation { .. } => Some(Stage::CreatingAccount),
            ProvisionError::RoleAssignment { .. } => Some(Stage::AssigningRole),
            ProvisionError::ResetLink { .. } => Some(Stage::RequestingResetLink),
            ProvisionError::EmailDelivery { .. } => Some(Stage::SendingEmail),
        }
    }

    /// The underlying connector error, if a remote call was reached.
    pub fn cause(&self) -> Option<&ConnectorError> {
        match self {
            ProvisionError::Validation(_) => None,
            ProvisionError::Authentication { source }
            | ProvisionError::AccountCreation { source, .. }
            | ProvisionError::RoleAssignment { source, .. }
            | ProvisionError::ResetLink { source, .. }
            | ProvisionError::EmailDelivery { source, .. } => Some(source),
        }
    }
}

/// Outcome of a fully successful provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionReceipt {
    pub account_id: AccountId,
    pub email: String,
}

/// Drives the provisioning chain for one request at a time. Holds no
/// per-run state; each run authenticates afresh and concurrent runs
/// share nothing but the connectors themselves.
pub struct Provisioner {
    platform: Arc<dyn BiPlatformConnector>,
    mailer: Arc<dyn EmailConnector>,
    settings: ProvisioningSettings,
}

impl Provisioner {
    pub fn new(
        platform: Arc<dyn BiPlatformConnector>,
        mailer: Arc<dyn EmailConnector>,
        settings: ProvisioningSettings,
    ) -> Self {
        Self {
            platform,
            mailer,
            settings,
        }
    }

    /// Runs the full chain. Each step's output feeds the next; the
    /// first failure aborts the rest.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn provision(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<ProvisionReceipt, ProvisionError> {
        let session = self.platform.authenticate().await.map_err(|source| {
            error!(stage = %Stage::Authenticating, error = %source, "provisioning failed");
            ProvisionError::Authentication { source }
        })?;
        info!("authenticated with analytics platform");

        let account_id = self
            .platform
            .create_account(
                &session,
                &request.first_name,
                &request.last_name,
                &request.email,
            )
            .await
            .map_err(|source| {
                error!(stage = %Stage::CreatingAccount, error = %source, "provisioning failed");
                ProvisionError::AccountCreation {
                    email: request.email.clone(),
                    source,
                }
            })?;
        info!(%account_id, "account created");

        self.platform
            .assign_role(&session, account_id, self.settings.role_id)
            .await
            .map_err(|source| {
                // The account now exists without its intended role
                error!(
                    stage = %Stage::AssigningRole,
                    %account_id,
                    error = %source,
                    "provisioning failed, account left without role"
                );
                ProvisionError::RoleAssignment { account_id, source }
            })?;
        info!(%account_id, role_id = %self.settings.role_id, "role assigned");

        let reset_link = self
            .platform
            .request_password_reset_link(&session, account_id)
            .await
            .map_err(|source| {
                error!(
                    stage = %Stage::RequestingResetLink,
                    %account_id,
                    error = %source,
                    "provisioning failed, user has no password setup link"
                );
                ProvisionError::ResetLink { account_id, source }
            })?;
        info!(%account_id, "password reset link issued");

        let message = self.settings.welcome_email(&request.email, &reset_link);
        self.mailer
            .send_welcome_email(&message)
            .await
            .map_err(|source| {
                error!(
                    stage = %Stage::SendingEmail,
                    %account_id,
                    error = %source,
                    "provisioning failed, welcome email not delivered"
                );
                ProvisionError::EmailDelivery { account_id, source }
            })?;
        info!(%account_id, "provisioning complete");

        Ok(ProvisionReceipt {
            account_id,
            email: request.email.clone(),
        })
    }
}
