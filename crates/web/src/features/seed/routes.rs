use axum::{Router, middleware, routing::post};

use super::handlers::run_seed;
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/seed", post(run_seed))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Unauthenticated seeding, only mounted when explicitly allowed.
pub fn open_routes() -> Router<AppState> {
    Router::new().route("/seed-open", post(run_seed))
}
