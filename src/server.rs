/// Server setup and initialization
///
/// Wires together all components: configuration, database pool, media store,
/// project service, and HTTP routes.

use crate::{
    api::{create_project_routes, AppState},
    config::{Config, ServerConfig},
    media::CloudinaryStore,
    project::{database, ProjectService, ProjectStorage},
};
use anyhow::Result;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Create the main Axum application with all routes and middleware
///
/// Opens the database (creating the schema if needed), builds the media
/// client from the configured credentials, and wires both into the service.
pub async fn create_app(config: &Config) -> Result<Router> {
    tracing::info!("🏗️ Initializing project storage");
    let pool = database::connect(&config.database).await?;
    let storage = Arc::new(ProjectStorage::new(pool));

    tracing::info!("☁️ Initializing media store (cloud: {}, folder: {})", config.media.cloud_name, config.media.folder);
    let media = Arc::new(
        CloudinaryStore::new(&config.media)
            .map_err(|e| anyhow::anyhow!("Failed to initialize media store: {}", e))?,
    );

    let service = Arc::new(ProjectService::new(storage, media, config.media.folder.clone()));

    let app = build_router(service, &config.server);
    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the router around an already-constructed service
///
/// Used by `create_app` and by tests that supply their own storage and
/// media store.
pub fn build_router(service: Arc<ProjectService>, server: &ServerConfig) -> Router {
    let state = AppState { service };

    Router::new()
        // Liveness check
        .route("/", get(liveness))
        .merge(create_project_routes(server.max_upload_bytes))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_backend=info,tower_http=info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting portfolio backend...");

    let app = create_app(&config).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Liveness endpoint handler
async fn liveness() -> &'static str {
    "Portfolio Backend API is running."
}
