use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{create_athlete, delete_athlete, list_athletes, update_athlete};
use crate::middleware::auth::{require_admin, require_auth, require_staff};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let staff = Router::new()
        .route("/", post(create_athlete))
        .route("/:id", put(update_athlete))
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/:id", delete(delete_athlete))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_athletes))
        .merge(staff)
        .merge(admin)
}
