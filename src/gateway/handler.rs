use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::arena::{ArenaError, Battle, Scoreboard};
use crate::rating::LeaderboardEntry;

use super::BENCHMARK_EXPLANATION;
use super::error::GatewayError;
use super::state::AppState;

/// Result submission payload. Fields are optional so a missing one maps to a
/// structured error instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct BattleResultRequest {
    pub battle_id: Option<String>,
    pub winner: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub explanation: &'static str,
    pub total_votes: u64,
}

/// `GET /api/battle` — a fresh battle card.
#[tracing::instrument(skip(state))]
pub async fn battle_handler(State(state): State<AppState>) -> Result<Json<Battle>, GatewayError> {
    let battle = state.arena.select_battle()?;
    Ok(Json(battle))
}

/// `POST /api/battle_result` — consume a token, record the winner.
#[tracing::instrument(skip(state, request))]
pub async fn battle_result_handler(
    State(state): State<AppState>,
    Json(request): Json<BattleResultRequest>,
) -> Result<Json<Scoreboard>, GatewayError> {
    let battle_id = request
        .battle_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(GatewayError::MissingField)?;
    let winner = request
        .winner
        .as_deref()
        .filter(|w| !w.is_empty())
        .ok_or(GatewayError::MissingField)?;

    // A token that does not even parse is indistinguishable from one that
    // never existed.
    let token = Uuid::parse_str(battle_id).map_err(|_| ArenaError::UnknownToken)?;

    let scoreboard = state.arena.submit_result(token, winner)?;
    Ok(Json(scoreboard))
}

/// `GET /api/leaderboard` — current standings, no side effects.
#[tracing::instrument(skip(state))]
pub async fn leaderboard_handler(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, GatewayError> {
    let scoreboard = state.arena.scoreboard()?;
    Ok(Json(LeaderboardResponse {
        leaderboard: scoreboard.leaderboard,
        explanation: BENCHMARK_EXPLANATION,
        total_votes: scoreboard.total_votes,
    }))
}
