use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use weather_core::{
    ApiKey, Coordinate, CredentialError, ServerConfig, WeatherProvider, provider_from_config,
    render_report, validate_latitude, validate_longitude,
};

use crate::error::AppError;

/// Per-process state shared by all requests. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    api_key: Result<ApiKey, CredentialError>,
    provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(
        api_key: Result<ApiKey, CredentialError>,
        provider: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self { api_key, provider }
    }

    /// Run one lookup: credential, latitude, longitude, upstream, report.
    pub async fn lookup(&self, raw_lat: &str, raw_lon: &str) -> Result<String, AppError> {
        let api_key = self.api_key.as_ref().map_err(|e| AppError::Credential(e.clone()))?;

        let latitude = validate_latitude(raw_lat)?;
        let longitude = validate_longitude(raw_lon)?;
        let at = Coordinate { latitude, longitude };

        let observation = self.provider.current_weather(at, api_key).await?;

        tracing::info!(
            lat = latitude,
            lon = longitude,
            condition = %observation.description,
            temperature_c = observation.temperature_c,
            "weather lookup succeeded"
        );

        Ok(render_report(&observation))
    }
}

/// Raw `lat`/`lon` query values. Absent keys are empty; repeated keys keep
/// their first value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WeatherQuery {
    pub lat: String,
    pub lon: String,
}

impl WeatherQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        Self { lat: first("lat"), lon: first("lon") }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(weather))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn weather(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, AppError> {
    // A list of pairs never fails to deserialize, so every rejection goes
    // through `lookup` and its check order.
    let query = WeatherQuery::from_pairs(&pairs);
    state.lookup(&query.lat, &query.lon).await
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if let Err(e) = &config.api_key {
        tracing::warn!(error = %e, "weather lookups will fail until the API key is fixed");
    }

    let provider =
        provider_from_config(&config.upstream).context("Failed to build OpenWeather client")?;
    let state = AppState::new(config.api_key, Arc::new(provider));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
