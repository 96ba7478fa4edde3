//! Guichet Server - Queue Management System
//!
//! A Rust REST API server for managing walk-in queues.

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guichet_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("guichet_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Guichet Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.queue.clone());

    // Idempotent bootstrap of the configured admin account
    services
        .auth
        .bootstrap_admin()
        .await
        .expect("Failed to bootstrap admin account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/signup", post(api::auth::signup))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Institutions and their services
        .route("/institutions", get(api::institutions::list_institutions))
        .route("/institutions", post(api::institutions::create_institution))
        .route("/institutions/:id", get(api::institutions::get_institution))
        .route("/institutions/:id", put(api::institutions::update_institution))
        .route("/institutions/:id/services", get(api::institutions::list_services))
        .route("/institutions/:id/services", post(api::institutions::create_service))
        .route("/institutions/:id/tickets", get(api::institutions::list_waiting_tickets))
        // Tickets
        .route("/tickets", post(api::tickets::create_ticket))
        .route("/tickets/:number", get(api::tickets::get_ticket))
        .route("/tickets/:number/stats", get(api::tickets::get_ticket_stats))
        .route("/tickets/:number/cancel", post(api::tickets::cancel_ticket))
        .route("/users/:id/tickets", get(api::tickets::get_user_tickets))
        // Operator desk
        .route("/operator/next", post(api::operator::call_next))
        .route("/operator/tickets/:number/start", post(api::operator::start_ticket))
        .route("/operator/tickets/:number/complete", post(api::operator::complete_ticket))
        .route("/operator/tickets/:number/miss", post(api::operator::miss_ticket))
        .route("/operator/:id/stats", get(api::operator::get_operator_stats))
        // Queue status
        .route("/queues/:institution_id", get(api::queues::get_queue_info))
        // Admin
        .route("/admin/stats", get(api::stats::get_admin_stats))
        .route("/admin/operators", get(api::stats::list_operators))
        .route("/admin/institutions/:id/operators", get(api::stats::list_institution_operators))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
