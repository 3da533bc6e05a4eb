//! API route definitions.

pub mod health;
pub mod metrics;
pub mod provision;

use axum::Router;

use crate::state::AppState;

/// Creates the complete API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(provision::routes())
        .merge(health::routes())
        .merge(metrics::routes())
        .with_state(state)
}
