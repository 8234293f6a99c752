use anyhow::Context;
use storage::Backend;
use web::{config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting athlete API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    match config.database_url.as_deref() {
        Some(url) => tracing::info!(
            "Connecting to database at: {}",
            url.split('@').next_back().unwrap_or("unknown")
        ),
        None => tracing::warn!("DATABASE_URL not set, athletes are kept in memory only"),
    }

    let backend = Backend::connect(config.database_url.as_deref())
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!("Storage backend ready: {}", backend.name());

    if config.upload.object_storage.is_some() {
        tracing::info!("Uploads go to object storage with local fallback");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(
        config,
        backend.athletes(),
        backend.users(),
        backend.database().cloned(),
    )
    .context("Failed to build application state")?;

    let app = web::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
