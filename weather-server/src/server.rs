//! Router construction and the serve loop.

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::any};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use weather_core::{Config, WeatherProvider, provider_from_config};

use crate::handlers;

/// Read-only state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Option<Arc<str>>,
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(api_key: Option<&str>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { api_key: api_key.map(Arc::from), provider }
    }
}

/// Creates the application router.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let static_dir = &config.static_dir;

    Router::new()
        .route("/weather", any(handlers::weather))
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server and runs until Ctrl-C.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);
    let state = AppState::new(config.api_key(), provider);
    let app = create_app(state, &config);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
