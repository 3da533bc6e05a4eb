//! Configuration loading for the onboarder CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// BI platform admin API settings.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Transactional email provider settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Provisioning behavior.
    #[serde(default)]
    pub provisioning: ProvisioningConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment variable overrides. The variable names match
    /// what the hosting environment has historically provided, secrets
    /// included, so config files never need to carry credentials.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(client_id) = lookup("apikey") {
            self.platform.client_id = client_id;
        }
        if let Some(client_secret) = lookup("apisecret") {
            self.platform.client_secret = client_secret;
        }
        if let Some(api_key) = lookup("SENDGRID_API_KEY") {
            self.email.api_key = api_key;
        }
        if let Some(role_id) = lookup("role_id") {
            self.provisioning.role_id = role_id
                .parse()
                .with_context(|| format!("role_id env var is not a number: {}", role_id))?;
        }
        Ok(())
    }

    /// Returns every configuration problem that would prevent the
    /// server from provisioning users.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.platform.base_url.is_empty() {
            errors.push("platform.base_url must be set".to_string());
        }
        if self.platform.client_id.is_empty() {
            errors.push("platform.client_id must be set (or the apikey env var)".to_string());
        }
        if self.platform.client_secret.is_empty() {
            errors.push("platform.client_secret must be set (or the apisecret env var)".to_string());
        }
        if self.email.api_key.is_empty() {
            errors.push("email.api_key must be set (or the SENDGRID_API_KEY env var)".to_string());
        }
        if self.provisioning.role_id <= 0 {
            errors.push("provisioning.role_id must be a positive role id".to_string());
        }
        if self.provisioning.email_from.is_empty() {
            errors.push("provisioning.email_from must be set".to_string());
        }
        if !self
            .provisioning
            .email_body_template
            .contains("{reset_link}")
        {
            errors.push(
                "provisioning.email_body_template must contain the {reset_link} placeholder"
                    .to_string(),
            );
        }

        // One webhook request drives the whole chain: up to
        // 1 + auth_retries login calls, two account-creation calls, one
        // role call, one reset-link call, and one email call. If the
        // server timeout is not strictly larger than the sum, a slow but
        // healthy chain gets cut off mid-run.
        let worst_case_chain = self.platform.timeout_secs
            * (5 + u64::from(self.platform.auth_retries))
            + self.email.timeout_secs;
        if self.server.request_timeout_secs <= worst_case_chain {
            errors.push(format!(
                "server.request_timeout_secs ({}) must exceed the worst-case \
                 provisioning chain of {}s (platform and email connector timeouts combined)",
                self.server.request_timeout_secs, worst_case_chain
            ));
        }

        errors
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();

        if !config.platform.client_secret.is_empty() {
            config.platform.client_secret = "***REDACTED***".to_string();
        }
        if !config.email.api_key.is_empty() {
            config.email.api_key = "***REDACTED***".to_string();
        }

        config
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. Covers the full provisioning chain,
    /// so it must exceed the combined connector timeouts; `validate`
    /// checks the relationship.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    240
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// BI platform admin API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the admin API, e.g. `https://company.looker.com:19999/api/4.0`.
    #[serde(default)]
    pub base_url: String,

    /// API client id.
    #[serde(default)]
    pub client_id: String,

    /// API client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra login attempts on transient failures.
    #[serde(default = "default_auth_retries")]
    pub auth_retries: u32,
}

fn default_auth_retries() -> u32 {
    1
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: default_timeout(),
            auth_retries: default_auth_retries(),
        }
    }
}

/// Transactional email provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Base URL of the mail API.
    #[serde(default = "default_email_base_url")]
    pub base_url: String,

    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_email_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            base_url: default_email_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Provisioning behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Role assigned to every newly created account.
    #[serde(default)]
    pub role_id: i64,

    /// Sender address for the welcome email.
    #[serde(default = "default_email_from")]
    pub email_from: String,

    /// Subject line for the welcome email.
    #[serde(default = "default_email_subject")]
    pub email_subject: String,

    /// Plain-text body template containing `{reset_link}`.
    #[serde(default = "default_email_body_template")]
    pub email_body_template: String,
}

fn default_email_from() -> String {
    "onboarding@example.com".to_string()
}

fn default_email_subject() -> String {
    "Welcome to the analytics platform".to_string()
}

fn default_email_body_template() -> String {
    "Hello,\n\nYour analytics account has been created. \
     Click this link to set your password and get started:\n\n{reset_link}\n"
        .to_string()
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            role_id: 0,
            email_from: default_email_from(),
            email_subject: default_email_subject(),
            email_body_template: default_email_body_template(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}
