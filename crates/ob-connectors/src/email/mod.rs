//! Transactional email connectors.

mod mock;
mod sendgrid;

pub use mock::MockEmailConnector;
pub use sendgrid::{SendGridConfig, SendGridConnector};
