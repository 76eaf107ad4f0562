//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemoryProfileSource, PgProfileSource},
    config::{Config, ProfileSourceKind},
    error::ApiError,
    web::{
        card_details_handler, decisions_handler, end_session_handler, get_feed_handler,
        health_handler, refresh_handler, require_viewer, rest::ApiDoc, state::AppState,
        swipe_handler,
    },
};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use swipe_feed_core::ProfileSource;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn build_profile_source(config: &Config) -> Result<Arc<dyn ProfileSource>, ApiError> {
    match config.profile_source {
        ProfileSourceKind::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
                .connect(database_url)
                .await?;
            let source = PgProfileSource::new(db_pool);
            info!("Running database migrations...");
            source.run_migrations().await?;
            info!("Database migrations complete.");
            Ok(Arc::new(source))
        }
        ProfileSourceKind::Memory => {
            let source = match &config.seed_profiles_path {
                Some(path) => InMemoryProfileSource::from_json_file(path)?,
                None => InMemoryProfileSource::default(),
            };
            info!(profiles = source.len(), "Using in-memory profile source");
            Ok(Arc::new(source))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Profile Source ---
    let profiles = build_profile_source(&config).await?;

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(profiles, config.clone()));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-role"),
        ]);

    // --- 4. Create the Web Router ---
    // Feed routes (viewer identity required)
    let feed_routes = Router::new()
        .route("/feed", get(get_feed_handler).delete(end_session_handler))
        .route("/feed/swipe", post(swipe_handler))
        .route("/feed/refresh", post(refresh_handler))
        .route("/feed/cards/{id}", get(card_details_handler))
        .route("/feed/decisions", get(decisions_handler))
        .layer(axum_middleware::from_fn(require_viewer));

    let api_router = Router::new()
        .route("/health", get(health_handler))
        .merge(feed_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
