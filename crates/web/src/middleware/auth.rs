use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use storage::models::{ROLE_ADMIN, ROLE_COACH};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller resolved from a verified bearer token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn has_any_role(&self, allowed: &[&str]) -> bool {
        allowed.iter().any(|r| self.roles.iter().any(|own| own == r))
    }
}

/// Verifies the bearer token and attaches a `CurrentUser` with roles
/// looked up fresh from the user repository.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(request.headers()).ok_or(WebError::Unauthorized)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        WebError::Unauthorized
    })?;

    let roles = state.users.roles_for(claims.sub).await.map_err(|e| {
        tracing::error!("Role lookup failed for {}: {:?}", claims.sub, e);
        WebError::Unauthorized
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
        roles,
    });

    Ok(next.run(request).await)
}

/// Admins and coaches.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, WebError> {
    ensure_role(&request, &[ROLE_ADMIN, ROLE_COACH])?;
    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, WebError> {
    ensure_role(&request, &[ROLE_ADMIN])?;
    Ok(next.run(request).await)
}

fn ensure_role(request: &Request, allowed: &[&str]) -> Result<(), WebError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(WebError::Unauthorized)?;

    if user.has_any_role(allowed) {
        Ok(())
    } else {
        tracing::warn!("User {} lacks any of {:?}", user.email, allowed);
        Err(WebError::Forbidden)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
