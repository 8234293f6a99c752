use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::services::{self, LoginResponse};
use crate::error::WebError;
use crate::extract::JsonBody;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Email and password required"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, WebError> {
    let (Some(email), Some(password)) = (
        req.email.filter(|e| !e.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(WebError::BadRequest(
            "Email and password required".to_string(),
        ));
    };

    let response = services::login(state.users.as_ref(), &state.tokens, &email, &password).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The authenticated caller", body = CurrentUser),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn me(Extension(user): Extension<CurrentUser>) -> Response {
    Json(json!({ "user": user })).into_response()
}
