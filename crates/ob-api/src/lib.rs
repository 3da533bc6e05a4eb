//! # ob-api
//!
//! HTTP surface of the onboarder service: the `/usr_gen` webhook that
//! triggers account provisioning, plus health and metrics endpoints.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
