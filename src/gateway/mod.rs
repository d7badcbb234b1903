//! HTTP gateway (Axum) for the arena.
//!
//! This module is primarily used by the `punchup` server binary; the routes
//! mirror the arena operations one-to-one.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{battle_handler, battle_result_handler, leaderboard_handler};
pub use state::AppState;

/// Shown alongside the leaderboard so API consumers can explain the numbers.
pub const BENCHMARK_EXPLANATION: &str = "Punchup pairs two jokes from the same category and lets visitors decide which model delivered the better punchline. Each click records a head-to-head result, updates the Elo ratings, and instantly refreshes the leaderboard.";

/// Builds the application router.
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/battle", get(battle_handler))
        .route("/api/battle_result", post(battle_result_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
