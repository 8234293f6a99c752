use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use super::handlers::upload;
use super::services::MAX_UPLOAD_BYTES;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

// Room for multipart boundaries and headers around a maximum-size file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
