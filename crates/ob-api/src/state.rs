//! Shared application state.

use metrics_exporter_prometheus::PrometheusHandle;
use ob_core::Provisioner;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The provisioning orchestrator.
    pub provisioner: Arc<Provisioner>,
    /// Prometheus metrics handle, if the recorder was installed.
    pub prometheus_handle: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates new application state.
    pub fn new(provisioner: Arc<Provisioner>) -> Self {
        Self {
            provisioner,
            prometheus_handle: None,
        }
    }

    /// Attaches a Prometheus handle for the `/metrics` endpoint.
    pub fn with_prometheus_handle(mut self, handle: Arc<PrometheusHandle>) -> Self {
        self.prometheus_handle = Some(handle);
        self
    }
}
