//! # ob-connectors
//!
//! Clients for the external systems the onboarding service talks to:
//! the analytics platform's admin API and the transactional email
//! provider. Trait definitions live in [`traits`]; real and mock
//! implementations live in [`platform`] and [`email`].

pub mod email;
pub mod http;
pub mod platform;
pub mod secure_string;
pub mod testing;
pub mod traits;

pub use secure_string::SecureString;
pub use traits::{
    AccountId, AuthConfig, BiPlatformConnector, ConnectorConfig, ConnectorError, ConnectorResult,
    EmailConnector, OutboundEmail, ResetLink, RoleId, SessionToken,
};

pub use email::{MockEmailConnector, SendGridConfig, SendGridConnector};
pub use platform::{CreatedAccount, LookerConfig, LookerConnector, MockPlatformConnector};
