//! # ob-observability
//!
//! Structured logging setup shared by the onboarder binaries.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
