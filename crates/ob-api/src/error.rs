//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ob_connectors::ConnectorError;
use ob_core::ProvisionError;
use thiserror::Error;
use tracing::error;

/// API error type.
///
/// The webhook caller is a form handler that only looks at the status
/// code, so responses carry no body. Details go to the logs instead.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request (wrong method, malformed or invalid payload).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An upstream service (BI platform or email provider) failed.
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(code = self.error_code(), error = %self, "request failed");
        status.into_response()
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match &err {
            ProvisionError::Validation(msg) => ApiError::BadRequest(msg.clone()),
            _ => match err.cause() {
                Some(ConnectorError::ConfigError(_)) | Some(ConnectorError::Internal(_)) => {
                    ApiError::Internal(err.to_string())
                }
                _ => ApiError::UpstreamFailure(err.to_string()),
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_connectors::AccountId;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UpstreamFailure("x".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provision_validation_maps_to_bad_request() {
        let err = ApiError::from(ProvisionError::Validation("bad name".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_rejection_maps_to_bad_gateway() {
        let err = ApiError::from(ProvisionError::AccountCreation {
            email: "ada@example.com".to_string(),
            source: ConnectorError::Rejected("email already exists".to_string()),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_config_cause_maps_to_internal() {
        let err = ApiError::from(ProvisionError::RoleAssignment {
            account_id: AccountId(42),
            source: ConnectorError::ConfigError("role id missing".to_string()),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
