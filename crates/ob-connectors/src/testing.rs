//! Helpers for connector tests.

use crate::secure_string::SecureString;
use crate::traits::{AuthConfig, ConnectorConfig};
use std::collections::HashMap;

/// Creates a test connector config with sensible defaults.
pub fn test_connector_config(name: &str, base_url: &str) -> ConnectorConfig {
    ConnectorConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        auth: AuthConfig::None,
        timeout_secs: 30,
        headers: HashMap::new(),
    }
}

/// Creates a test connector config with bearer token auth.
pub fn test_connector_config_with_bearer(
    name: &str,
    base_url: &str,
    token: &str,
) -> ConnectorConfig {
    ConnectorConfig {
        auth: AuthConfig::BearerToken {
            token: SecureString::from(token),
        },
        ..test_connector_config(name, base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = test_connector_config("test", "https://api.example.com");
        assert_eq!(config.name, "test");
        assert_eq!(config.timeout_secs, 30);
        assert!(matches!(config.auth, AuthConfig::None));
    }

    #[test]
    fn test_config_with_bearer() {
        let config =
            test_connector_config_with_bearer("test", "https://api.example.com", "token123");
        assert!(matches!(config.auth, AuthConfig::BearerToken { .. }));
    }
}
