//! HTTP server for dispatchd

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::routes;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
        }
    }
}

pub type AppStateArc = Arc<AppState>;

/// Full application router with middleware
pub fn router(state: AppStateArc, config: &ServerConfig) -> Router {
    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::alert_routes())
        .merge(routes::incident_routes())
        .merge(routes::referral_routes())
        .merge(routes::station_routes())
        .merge(routes::people_routes())
        .merge(routes::event_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    if config.cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Run the HTTP server until ctrl-c
pub async fn run(state: AppState, config: &ServerConfig) -> Result<()> {
    let app = router(Arc::new(state), config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("  Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down gracefully");
    }
}
