//! Punchup library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Catalog`], [`CategoryIndex`] - Immutable content catalog and the
//!   derived category index
//! - [`RatingStore`], [`RatingState`] - Durable, lock-guarded rating state
//! - [`Arena`], [`Battle`], [`Scoreboard`] - Matchmaking and result
//!   submission
//! - [`build_leaderboard`], [`apply_result`] - Pure rating math
//! - [`create_router_with_state`], [`AppState`] - HTTP gateway

pub mod arena;
pub mod catalog;
pub mod config;
pub mod gateway;
pub mod rating;
pub mod store;

pub use arena::{Arena, ArenaError, Battle, BattleLedger, Contestant, PendingBattle, Scoreboard};
pub use catalog::{Catalog, CatalogError, CategoryIndex, JokePool};
pub use config::{Config, ConfigError, LockMode};
pub use gateway::{AppState, BENCHMARK_EXPLANATION, GatewayError, create_router_with_state};
pub use rating::{
    DEFAULT_K, LeaderboardEntry, Rank, apply_result, build_leaderboard, rank_lookup,
};
pub use store::{FileLock, INITIAL_RATING, ProcessLock, RatingState, RatingStore, StateLock, StoreError};
