//! Analytics platform admin API connectors.

mod looker;
mod mock;

pub use looker::{LookerConfig, LookerConnector};
pub use mock::{CreatedAccount, MockPlatformConnector};
