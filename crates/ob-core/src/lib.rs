//! # ob-core
//!
//! Domain logic for webhook-driven analytics-platform onboarding: the
//! provisioning request model, the email/role settings, and the
//! orchestrator that sequences the remote calls.

pub mod provision;
pub mod request;
pub mod settings;

pub use provision::{ProvisionError, ProvisionReceipt, Provisioner, Stage};
pub use request::ProvisioningRequest;
pub use settings::ProvisioningSettings;
