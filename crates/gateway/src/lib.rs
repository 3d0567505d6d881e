//! HTTP gateway for Promptforge.
//!
//! Exposes the SSE stream relay (`POST /api/generate`) plus the small JSON
//! API the client needs around it: catalog options, model listing, web
//! search, and topic/goal suggestions.
//!
//! Built on Axum. The relay endpoint always answers `200 OK` and reports
//! failures in-band as `error` events, so clients only ever parse one
//! protocol.

pub mod api;
pub mod relay;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use promptforge_config::AppConfig;
use promptforge_core::catalog::Catalog;
use promptforge_core::provider::Provider;
use promptforge_providers::OpenAiCompatProvider;
use promptforge_tools::search_client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub provider: Arc<dyn Provider>,
    pub catalog: Arc<Catalog>,
    /// Pre-built HTTP client for web search, with the scrape user agent.
    pub search_client: reqwest::Client,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Build state from configuration with the standard upstream provider.
    ///
    /// A missing API key is not an error here: the relay reports it per
    /// request as an in-band `error` event.
    pub fn from_config(config: AppConfig) -> SharedState {
        let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::new(
            config.provider.name.clone(),
            config.provider.base_url.clone(),
            config.provider.api_key.clone().unwrap_or_default(),
        ));
        Arc::new(GatewayState {
            search_client: search_client(Duration::from_secs(config.agent.search_timeout_secs)),
            provider,
            catalog: Arc::new(Catalog::seed()),
            config,
        })
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(relay::generate_handler))
        .route("/api/search", post(api::search_handler))
        .route("/api/options", get(api::options_handler))
        .route("/api/models", get(api::models_handler))
        .route("/api/suggest-topics", post(api::suggest_topics_handler))
        .route("/api/suggest-goals", post(api::suggest_goals_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: explicit origins from config, or any origin when none are
/// configured (the open local-app default).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = GatewayState::from_config(config);
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
