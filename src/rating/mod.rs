//! Rating math: the Elo update rule and leaderboard derivation.
//!
//! Both are pure functions over a [`RatingState`](crate::store::RatingState)
//! snapshot; the arena layer decides when they run and under which lock.

pub mod elo;
pub mod leaderboard;

pub use elo::{DEFAULT_K, apply_result};
pub use leaderboard::{LeaderboardEntry, Rank, build_leaderboard, rank_lookup};
