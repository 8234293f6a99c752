use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        athlete::{CreateAthleteRequest, UpdateAthleteRequest},
        common::ListResponse,
    },
    models::Athlete,
};

use crate::error::WebError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/athletes",
    responses(
        (status = 200, description = "Most recently created athletes", body = ListResponse<Athlete>)
    ),
    tag = "athletes"
)]
pub async fn list_athletes(State(state): State<AppState>) -> Result<Response, WebError> {
    let listed = state.athletes.list().await?;

    Ok(Json(listed).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes",
    request_body = CreateAthleteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Athlete created successfully", body = Athlete),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires admin or coach role")
    ),
    tag = "athletes"
)]
pub async fn create_athlete(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAthleteRequest>,
) -> Result<Response, WebError> {
    let athlete = state.athletes.create(req).await?;

    Ok((StatusCode::CREATED, Json(athlete)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/athletes/{id}",
    params(
        ("id" = String, Path, description = "Athlete id")
    ),
    request_body = UpdateAthleteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Athlete updated successfully", body = Athlete),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires admin or coach role"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    let updated = state.athletes.update(&id, patch).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/athletes/{id}",
    params(
        ("id" = String, Path, description = "Athlete id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Athlete deleted, or was already absent"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires admin role")
    ),
    tag = "athletes"
)]
pub async fn delete_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    state.athletes.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
