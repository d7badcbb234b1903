//! Standard Elo update.

use crate::store::{INITIAL_RATING, RatingState};

/// Default K-factor: how far one result moves a rating.
pub const DEFAULT_K: f64 = 32.0;

/// Logistic scale of the expected-score curve.
const ELO_SCALE: f64 = 400.0;

/// Expected score for a player rated `rating` against `opponent`.
fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
}

/// Applies one win/loss outcome to the ratings in `state`.
///
/// Both expectations are computed from the pre-update ratings (simultaneous
/// update); sequencing them would skew the second side's expectation. Ratings
/// are not clamped and may drift below zero over many results.
pub fn apply_result(state: &mut RatingState, winner: &str, loser: &str, k: f64) {
    let winner_rating = state.ratings.get(winner).copied().unwrap_or(INITIAL_RATING);
    let loser_rating = state.ratings.get(loser).copied().unwrap_or(INITIAL_RATING);

    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = expected_score(loser_rating, winner_rating);

    state
        .ratings
        .insert(winner.to_string(), winner_rating + k * (1.0 - expected_winner));
    state
        .ratings
        .insert(loser.to_string(), loser_rating + k * (0.0 - expected_loser));
}
