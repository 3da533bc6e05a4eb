//! The `/usr_gen` webhook endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use metrics::counter;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::ProvisionUserPayload;
use crate::error::ApiError;
use crate::state::AppState;
use ob_core::ProvisioningRequest;

/// Creates provisioning routes.
///
/// The upstream form handler treats anything other than a POST as a
/// malformed request, so the method fallback answers 400 rather than
/// the usual 405.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/usr_gen",
        post(provision_user).fallback(method_not_allowed),
    )
}

/// Receives a `{name, email}` payload and provisions the user.
///
/// Responds 200 with an empty body on success, 400 for a payload that
/// never reached an upstream service, 502 when an upstream call
/// failed, and 500 for configuration or internal faults.
async fn provision_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload: ProvisionUserPayload = serde_json::from_slice(&body).map_err(|e| {
        counter!("ob_provision_requests_total", "outcome" => "rejected").increment(1);
        warn!(error = %e, "malformed provisioning payload");
        ApiError::BadRequest(format!("Invalid JSON payload: {}", e))
    })?;

    if let Err(e) = payload.validate() {
        counter!("ob_provision_requests_total", "outcome" => "rejected").increment(1);
        warn!(error = %e, "provisioning payload failed validation");
        return Err(e.into());
    }

    let request = ProvisioningRequest::parse(&payload.name, &payload.email).map_err(|e| {
        counter!("ob_provision_requests_total", "outcome" => "rejected").increment(1);
        warn!(error = %e, "provisioning payload failed validation");
        ApiError::from(e)
    })?;

    // Once started, the chain must reach completion or a reported
    // failure even if the caller goes away, so it runs on a detached
    // task. A response timeout abandons the wait, never the run.
    let provisioner = state.provisioner.clone();
    let run = tokio::spawn(async move {
        let outcome = provisioner.provision(&request).await;
        match &outcome {
            Ok(receipt) => {
                counter!("ob_provision_requests_total", "outcome" => "success").increment(1);
                info!(account_id = %receipt.account_id, email = %receipt.email, "user provisioned");
            }
            Err(e) => {
                let stage = e
                    .stage()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "VALIDATING".to_string());
                counter!("ob_provision_requests_total", "outcome" => "failed", "stage" => stage)
                    .increment(1);
            }
        }
        outcome
    });

    match run.await {
        Ok(Ok(_)) => Ok(StatusCode::OK),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(ApiError::Internal(format!("provisioning task failed: {}", e))),
    }
}

/// Answers non-POST requests to `/usr_gen`.
async fn method_not_allowed() -> StatusCode {
    StatusCode::BAD_REQUEST
}
