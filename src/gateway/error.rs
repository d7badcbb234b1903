use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::arena::ArenaError;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("battle_id and winner are required")]
    MissingField,

    #[error(transparent)]
    Arena(#[from] ArenaError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Client mistakes are 4xx; data-integrity and durability failures
        // are 5xx with no partial leaderboard attached.
        let status = match &self {
            GatewayError::MissingField => StatusCode::BAD_REQUEST,
            GatewayError::Arena(ArenaError::UnknownToken) => StatusCode::BAD_REQUEST,
            GatewayError::Arena(ArenaError::InvalidWinner) => StatusCode::BAD_REQUEST,
            GatewayError::Arena(ArenaError::NoEligibleCategory) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Arena(ArenaError::CatalogInconsistency { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Arena(ArenaError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
