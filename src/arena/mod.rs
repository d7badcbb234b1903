//! Matchmaking and result submission.
//!
//! The [`Arena`] ties the immutable catalog, the durable rating store, and
//! the in-memory battle ledger together. Matchmaking reads a rating snapshot
//! for display ranks, picks a category and two contestants uniformly at
//! random, and registers the pair under a fresh token. A submitted result
//! consumes the token and commits the Elo update in one store transaction.

pub mod error;
pub mod ledger;

#[cfg(test)]
mod tests;

pub use error::ArenaError;
pub use ledger::{BattleLedger, PendingBattle};

use std::sync::Arc;

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::rating::{
    DEFAULT_K, LeaderboardEntry, Rank, apply_result, build_leaderboard, rank_lookup,
};
use crate::store::RatingStore;

/// One side of a battle card.
#[derive(Debug, Clone, Serialize)]
pub struct Contestant {
    pub id: String,
    pub joke: String,
    pub rank: Rank,
}

/// A battle card handed to the caller: two jokes, one token.
#[derive(Debug, Clone, Serialize)]
pub struct Battle {
    pub battle_id: Uuid,
    pub category: String,
    pub contestants: [Contestant; 2],
}

/// Leaderboard plus the global vote total, as returned after reads and votes.
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub total_votes: u64,
}

/// The rating arena.
pub struct Arena {
    catalog: Arc<Catalog>,
    store: Arc<RatingStore>,
    ledger: BattleLedger,
    // Outer critical section for submissions: ledger pop and rating commit
    // must not interleave between two submissions for the same token.
    results: Mutex<()>,
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("pending_battles", &self.ledger.pending())
            .field("store", &self.store)
            .finish()
    }
}

impl Arena {
    /// Creates an arena over a catalog and store.
    pub fn new(catalog: Arc<Catalog>, store: Arc<RatingStore>) -> Self {
        Self {
            catalog,
            store,
            ledger: BattleLedger::new(),
            results: Mutex::new(()),
        }
    }

    /// Number of battles awaiting a result.
    pub fn pending_battles(&self) -> usize {
        self.ledger.pending()
    }

    /// Picks a random category and two distinct contestants, registers the
    /// pair in the ledger, and returns the battle card.
    ///
    /// Ranks on the card come from a shared-lock snapshot taken here; they
    /// are display-only and may be stale by the time the vote arrives.
    pub fn select_battle(&self) -> Result<Battle, ArenaError> {
        let index = self.catalog.index();
        if index.is_empty() {
            return Err(ArenaError::NoEligibleCategory);
        }

        let state = self.store.read()?;
        let ranks = rank_lookup(&build_leaderboard(&state));

        let mut rng = rand::rng();

        let category = index
            .categories()
            .choose(&mut rng)
            .ok_or(ArenaError::NoEligibleCategory)?;
        let eligible = index
            .models_in(category)
            .ok_or(ArenaError::NoEligibleCategory)?;

        // Sampling without replacement; the index guarantees ≥ 2 entries.
        let pair: Vec<&String> = eligible.choose_multiple(&mut rng, 2).collect();
        let [model_a, model_b] = pair.as_slice() else {
            return Err(ArenaError::NoEligibleCategory);
        };

        let contestants = [
            self.draw_contestant(model_a, category, &ranks, &mut rng)?,
            self.draw_contestant(model_b, category, &ranks, &mut rng)?,
        ];

        let battle_id = self.ledger.register(PendingBattle {
            model_a: (*model_a).clone(),
            model_b: (*model_b).clone(),
        });

        tracing::debug!(
            battle_id = %battle_id,
            category = %category,
            model_a = %model_a,
            model_b = %model_b,
            "battle selected"
        );

        Ok(Battle {
            battle_id,
            category: category.clone(),
            contestants,
        })
    }

    /// Consumes `token` and commits the result.
    ///
    /// Pop-then-validate: an unknown token fails before any state is touched;
    /// a winner outside the pair fails *after* the pop, so the token is spent
    /// either way. The Elo update, winner vote count, and global counter all
    /// commit inside one exclusive store transaction.
    pub fn submit_result(&self, token: Uuid, winner: &str) -> Result<Scoreboard, ArenaError> {
        let _section = self.results.lock();

        let battle = self.ledger.take(&token).ok_or(ArenaError::UnknownToken)?;
        let loser = battle
            .opponent_of(winner)
            .ok_or(ArenaError::InvalidWinner)?
            .to_string();

        let (state, leaderboard) = self.store.update(|state| {
            apply_result(state, winner, &loser, DEFAULT_K);
            *state.votes.entry(winner.to_string()).or_insert(0) += 1;
            state.total_votes += 1;
            build_leaderboard(state)
        })?;

        tracing::info!(
            battle_id = %token,
            winner = %winner,
            loser = %loser,
            total_votes = state.total_votes,
            "battle result recorded"
        );

        Ok(Scoreboard {
            leaderboard,
            total_votes: state.total_votes,
        })
    }

    /// Current leaderboard and vote total, no side effects.
    pub fn scoreboard(&self) -> Result<Scoreboard, ArenaError> {
        let state = self.store.read()?;
        let leaderboard = build_leaderboard(&state);
        Ok(Scoreboard {
            leaderboard,
            total_votes: state.total_votes,
        })
    }

    fn draw_contestant(
        &self,
        model: &str,
        category: &str,
        ranks: &std::collections::HashMap<String, u32>,
        rng: &mut impl rand::Rng,
    ) -> Result<Contestant, ArenaError> {
        let joke = self
            .catalog
            .jokes_for(model, category)
            .and_then(|jokes| jokes.choose(rng))
            .ok_or_else(|| ArenaError::CatalogInconsistency {
                model: model.to_string(),
                category: category.to_string(),
            })?;

        Ok(Contestant {
            id: model.to_string(),
            joke: joke.clone(),
            rank: Rank::from(ranks.get(model).copied()),
        })
    }
}
