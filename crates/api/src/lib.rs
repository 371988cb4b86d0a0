//! # Tutorly API
//!
//! HTTP layer of the tutoring marketplace: tutor profiles, weekly
//! availability, session bookings and the credit ledger.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths grouped by area
//! - **Handlers**: extract requests and call into `tutorly_core::services`
//! - **Middleware**: bearer-token sessions and error-to-response mapping
//! - **Config**: environment configuration
//!
//! Persistence is injected as an `Arc<dyn Store>`, so the same router runs
//! against PostgreSQL in production and against `MemoryStore` in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Session authentication and error mapping
pub mod middleware;
/// Route definitions
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use tutorly_core::store::Store;

/// Shared state handed to every handler.
pub struct ApiState {
    pub store: Arc<dyn Store>,
    /// Lifetime of a login session.
    pub session_ttl: chrono::Duration,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, session_ttl_hours: i64) -> Self {
        Self {
            store,
            session_ttl: chrono::Duration::hours(session_ttl_hours),
        }
    }
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::account::routes())
        .merge(routes::tutor::routes())
        .merge(routes::availability::routes())
        .merge(routes::booking::routes())
        .merge(routes::ledger::routes())
        .with_state(state)
}

/// Installs the process-wide log subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server on the configured address.
///
/// # Example
///
/// ```ignore
/// let config = ApiConfig::from_env()?;
/// init_tracing(config.log_level)?;
/// let pool = tutorly_db::create_pool(&config.database_url).await?;
/// start_server(config, Arc::new(PgStore::new(pool))).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    let state = Arc::new(ApiState::new(store, config.session_ttl_hours));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
