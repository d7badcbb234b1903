//! Leaderboard derivation.
//!
//! Recomputed fresh from a state snapshot on every read and every vote —
//! ranks shift after each result, so caching would serve stale positions.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::store::RatingState;

/// One leaderboard row. `elo` is rounded to one decimal for display; the
/// stored rating keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub model: String,
    pub elo: f64,
    pub votes: u64,
}

/// Display rank of a battle contestant.
///
/// `Unranked` should not occur once the store backfills the roster, but the
/// wire contract keeps the `"-"` sentinel for models without a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Ranked(u32),
    Unranked,
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rank::Ranked(position) => serializer.serialize_u32(*position),
            Rank::Unranked => serializer.serialize_str("-"),
        }
    }
}

impl From<Option<u32>> for Rank {
    fn from(position: Option<u32>) -> Self {
        match position {
            Some(position) => Rank::Ranked(position),
            None => Rank::Unranked,
        }
    }
}

/// Sorts models by rating descending and assigns contiguous 1-based ranks.
pub fn build_leaderboard(state: &RatingState) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<(&String, f64)> = state
        .ratings
        .iter()
        .map(|(model, rating)| (model, *rating))
        .collect();

    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, (model, rating))| LeaderboardEntry {
            rank: position as u32 + 1,
            model: model.clone(),
            elo: (rating * 10.0).round() / 10.0,
            votes: state.votes.get(model).copied().unwrap_or(0),
        })
        .collect()
}

/// Model → rank lookup over a freshly built leaderboard.
pub fn rank_lookup(leaderboard: &[LeaderboardEntry]) -> HashMap<String, u32> {
    leaderboard
        .iter()
        .map(|entry| (entry.model.clone(), entry.rank))
        .collect()
}
