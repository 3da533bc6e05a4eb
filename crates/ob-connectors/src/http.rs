//! HTTP utilities shared by the connectors.
//!
//! A thin wrapper around `reqwest` that applies the connector's timeout
//! and static auth, and classifies transport and status failures into
//! `ConnectorError` variants. No automatic retries: every upstream call
//! in the provisioning chain except authentication is non-idempotent.

use crate::traits::{AuthConfig, ConnectorConfig, ConnectorError, ConnectorResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client bound to one connector configuration.
pub struct HttpClient {
    client: Client,
    config: ConnectorConfig,
}

impl HttpClient {
    /// Creates a new HTTP client from connector configuration.
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::try_from(key.as_str()),
                reqwest::header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, val);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .default_headers(headers)
            .build()
            .map_err(|e| ConnectorError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Joins a path onto the configured base URL.
    pub fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Starts a POST request for `path`.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.build_url(path))
    }

    /// Starts a PUT request for `path`.
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.build_url(path))
    }

    /// Sends a request once, applying static auth and mapping transport
    /// and status failures to `ConnectorError`.
    pub async fn execute(&self, request: RequestBuilder) -> ConnectorResult<Response> {
        let request = self.apply_auth(request);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ConnectorError::Timeout(e.to_string())
            } else if e.is_connect() {
                ConnectorError::ConnectionFailed(e.to_string())
            } else {
                ConnectorError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_client_error() {
            return match status {
                StatusCode::UNAUTHORIZED => {
                    Err(ConnectorError::AuthenticationFailed("unauthorized".into()))
                }
                StatusCode::FORBIDDEN => {
                    Err(ConnectorError::AuthorizationDenied("forbidden".into()))
                }
                StatusCode::NOT_FOUND => {
                    Err(ConnectorError::NotFound("resource not found".into()))
                }
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    Err(ConnectorError::Rejected(format!(
                        "{}: {}",
                        status,
                        body.chars().take(500).collect::<String>()
                    )))
                }
            };
        }
        if status.is_server_error() {
            return Err(ConnectorError::RequestFailed(format!(
                "server error: {}",
                status
            )));
        }

        Ok(response)
    }

    /// Sends a request and deserializes the JSON response body.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ConnectorResult<T> {
        let response = self.execute(request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            ConnectorError::InvalidResponse(format!(
                "failed to parse response (status {}): {} - body: {}",
                status,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            AuthConfig::None => request,
            AuthConfig::ApiKey { key, header_name } => {
                request.header(header_name, key.expose_secret())
            }
            AuthConfig::BearerToken { token } => request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_connector_config;

    #[test]
    fn test_build_url() {
        let client = HttpClient::new(test_connector_config(
            "test",
            "https://bi.example.com:19999/api/4.0",
        ))
        .unwrap();

        assert_eq!(
            client.build_url("/users"),
            "https://bi.example.com:19999/api/4.0/users"
        );
        assert_eq!(
            client.build_url("users"),
            "https://bi.example.com:19999/api/4.0/users"
        );
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let client =
            HttpClient::new(test_connector_config("test", "https://api.example.com/")).unwrap();
        assert_eq!(client.build_url("/login"), "https://api.example.com/login");
    }
}
