use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod middleware;
pub mod state;

use features::upload::services::LOCAL_URL_PREFIX;
use state::AppState;

const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::ping::ping,
        features::athletes::handlers::list_athletes,
        features::athletes::handlers::create_athlete,
        features::athletes::handlers::update_athlete,
        features::athletes::handlers::delete_athlete,
        features::auth::handlers::login,
        features::auth::handlers::me,
        features::upload::handlers::upload,
        features::seed::handlers::run_seed,
    ),
    components(
        schemas(
            storage::models::Athlete,
            storage::models::Metrics,
            storage::dto::athlete::CreateAthleteRequest,
            storage::dto::athlete::UpdateAthleteRequest,
            features::auth::handlers::LoginRequest,
            features::auth::services::LoginResponse,
            features::auth::services::UserProfile,
            features::upload::handlers::UploadResponse,
            features::ping::PingResponse,
            middleware::auth::CurrentUser,
        )
    ),
    tags(
        (name = "athletes", description = "Athlete profiles"),
        (name = "auth", description = "Sign-in and caller identity"),
        (name = "upload", description = "Avatar and video media"),
        (name = "seed", description = "Demo data"),
        (name = "health", description = "Liveness"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Full HTTP surface wired to the given state.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/ping", get(features::ping::ping))
        .nest("/athletes", features::athletes::routes::routes(state.clone()))
        .nest("/auth", features::auth::routes::routes(state.clone()))
        .nest("/upload", features::upload::routes::routes(state.clone()))
        .merge(features::seed::routes::routes(state.clone()));

    if state.config.allow_open_seed {
        tracing::warn!("ALLOW_OPEN_SEED is enabled, /api/seed-open accepts anonymous requests");
        api = api.merge(features::seed::routes::open_routes());
    }

    let uploads = ServeDir::new(state.uploads.local_dir());

    Router::new()
        .nest("/api", api)
        .nest_service(LOCAL_URL_PREFIX, uploads)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
