use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "IPL Auction Insights Agent";

/// Service banner payload.
#[derive(Serialize)]
pub struct BannerResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    pub webhook: &'static str,
    pub health: &'static str,
}

/// Per-dependency health.
#[derive(Serialize)]
pub struct ServiceHealth {
    /// Whether the database is reachable.
    pub database: bool,
    /// Whether the vector store is configured and reachable.
    pub vector_store: bool,
    /// Whether a language model is configured.
    pub llm: bool,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub services: ServiceHealth,
}

/// GET / -- service banner.
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        status: "online",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            webhook: "/whatsapp/webhook",
            health: "/health",
        },
    })
}

/// GET /health -- returns service and dependency health.
///
/// Optional services being unconfigured does not degrade the status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = auction_db::health_check(&state.pool).await.is_ok();

    let vector_store = match &state.player_index {
        Some(index) => index.is_healthy().await,
        None => false,
    };

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceHealth {
            database,
            vector_store,
            llm: state.assistant.llm_configured(),
        },
    })
}

/// Mount the banner and health routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}
