//! The `serve` command: wire up connectors and run the API server.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use ob_api::{ApiServer, ApiServerConfig, AppState};
use ob_connectors::{
    AuthConfig, ConnectorConfig, LookerConfig, LookerConnector, RoleId, SecureString,
    SendGridConfig, SendGridConnector,
};
use ob_core::{Provisioner, ProvisioningSettings};

use crate::config::AppConfig;

/// Server startup parameters from the command line.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the provisioning chain from configuration and runs the API
/// server until shutdown.
pub async fn run_server(serve_config: ServeConfig, app_config: AppConfig) -> Result<()> {
    let platform = build_platform_connector(&app_config)?;
    let mailer = build_email_connector(&app_config)?;

    let settings = ProvisioningSettings {
        role_id: RoleId(app_config.provisioning.role_id),
        email_from: app_config.provisioning.email_from.clone(),
        email_subject: app_config.provisioning.email_subject.clone(),
        email_body_template: app_config.provisioning.email_body_template.clone(),
    };
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid provisioning settings: {}", e))?;

    let provisioner = Provisioner::new(platform, mailer, settings);

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus metrics recorder")?;

    let state = AppState::new(Arc::new(provisioner))
        .with_prometheus_handle(Arc::new(prometheus_handle));

    let bind_address: SocketAddr = format!("{}:{}", serve_config.host, serve_config.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address: {}:{}",
                serve_config.host, serve_config.port
            )
        })?;

    let server_config = ApiServerConfig {
        bind_address,
        request_timeout: Duration::from_secs(app_config.server.request_timeout_secs),
    };

    info!(role_id = app_config.provisioning.role_id, "onboarder configured");
    ApiServer::new(state, server_config).run().await?;
    Ok(())
}

fn build_platform_connector(config: &AppConfig) -> Result<Arc<LookerConnector>> {
    let connector = LookerConnector::new(LookerConfig {
        connector: ConnectorConfig {
            name: "looker".to_string(),
            base_url: config.platform.base_url.clone(),
            // Credentials are exchanged per run at the login endpoint,
            // not attached statically
            auth: AuthConfig::None,
            timeout_secs: config.platform.timeout_secs,
            headers: HashMap::new(),
        },
        client_id: config.platform.client_id.clone(),
        client_secret: SecureString::from(config.platform.client_secret.as_str()),
        auth_retries: config.platform.auth_retries,
    })
    .context("Failed to initialize the Looker connector")?;
    Ok(Arc::new(connector))
}

fn build_email_connector(config: &AppConfig) -> Result<Arc<SendGridConnector>> {
    let connector = SendGridConnector::new(SendGridConfig {
        connector: ConnectorConfig {
            name: "sendgrid".to_string(),
            base_url: config.email.base_url.clone(),
            auth: AuthConfig::BearerToken {
                token: SecureString::from(config.email.api_key.as_str()),
            },
            timeout_secs: config.email.timeout_secs,
            headers: HashMap::new(),
        },
    })
    .context("Failed to initialize the SendGrid connector")?;
    Ok(Arc::new(connector))
}
