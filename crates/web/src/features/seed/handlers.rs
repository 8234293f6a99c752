use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    error::StorageError,
    services::seed::{DEMO_ACCOUNTS, SeedAccount, seed_demo_data},
};

use crate::error::WebError;
use crate::features::auth::services::hash_password;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/seed",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Demo roles, accounts and athletes written"),
        (status = 400, description = "Database not configured"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires admin role"),
        (status = 500, description = "Seeding failed")
    ),
    tag = "seed"
)]
pub async fn run_seed(State(state): State<AppState>) -> Result<Response, WebError> {
    let db = state
        .database
        .as_ref()
        .ok_or(WebError::Storage(StorageError::NotConfigured))?;

    let accounts = DEMO_ACCOUNTS
        .iter()
        .map(|account| {
            Ok(SeedAccount {
                account,
                password_hash: hash_password(account.password)?,
            })
        })
        .collect::<Result<Vec<_>, WebError>>()?;

    if let Err(e) = seed_demo_data(db, &accounts).await {
        tracing::error!("Seeding failed: {:?}", e);
        let body = Json(json!({ "error": "Seeding failed" }));
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, body).into_response());
    }

    Ok(Json(json!({ "ok": true })).into_response())
}
