mod auth;
mod config;
mod csv_ingest;
mod db;
mod db_storage;
mod enrichment;
mod errors;
mod handlers;
mod models;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection and schema bootstrap.
/// - Caches (auth tokens, directory lookups).
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prospect_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool and make sure tables exist
    let db = Database::new(&config.database_url).await?;
    db.ensure_schema().await?;
    tracing::info!("Database connection pool established");

    // Token -> user cache (5 minute TTL, 10k max entries); bad tokens are
    // cached as None so repeated garbage does not hit the users table
    let token_cache = Cache::builder()
        .time_to_live(Duration::from_secs(300))
        .max_capacity(10_000)
        .build();
    tracing::info!("Auth token cache initialized");

    // Directory lookup cache for the city/website auto-fill (1 hour TTL)
    // The directory is seeded reference data and changes only on reseed
    let directory_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(50_000)
        .build();
    tracing::info!("Company directory cache initialized");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        db: db.pool.clone(),
        config: config.clone(),
        token_cache,
        directory_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // CORS: locked to the frontend origin when configured, permissive otherwise
    let cors = match &config.frontend_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    // Build rate-limited routes with security layers
    let api_routes = Router::new()
        // Accounts
        .route("/api/v1/auth/register", post(handlers::register))
        .route("/api/v1/auth/login", post(handlers::login))
        // Leads
        .route(
            "/api/v1/leads",
            post(handlers::save_lead)
                .get(handlers::list_leads)
                .delete(handlers::clear_leads),
        )
        .route("/api/v1/leads/manual", post(handlers::add_manual_lead))
        .route("/api/v1/leads/upload", post(handlers::upload_leads))
        .route("/api/v1/leads/export", get(handlers::export_leads))
        .route("/api/v1/leads/:id", delete(handlers::delete_lead))
        // Company directory
        .route("/api/v1/companies", get(handlers::list_companies))
        .route("/api/v1/companies/search", get(handlers::search_companies))
        .route("/api/v1/companies/:id", get(handlers::get_company))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 5MB max payload (covers CSV uploads)
                .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
