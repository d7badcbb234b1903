//! Registry of battles awaiting a result.
//!
//! Entries are keyed by an opaque token handed to the caller with the battle
//! card. A token is consumed by exactly one successful [`BattleLedger::take`];
//! battles nobody votes on stay registered for the process lifetime (no
//! expiry, bounded only by memory — the type owns the map so eviction could
//! be added without touching callers).

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

/// The two models eligible to be declared winner for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBattle {
    pub model_a: String,
    pub model_b: String,
}

impl PendingBattle {
    /// Returns `true` if `model` is one of the two contestants.
    pub fn contains(&self, model: &str) -> bool {
        self.model_a == model || self.model_b == model
    }

    /// Returns the contestant that is not `model`, if `model` is in the pair.
    pub fn opponent_of(&self, model: &str) -> Option<&str> {
        if self.model_a == model {
            Some(&self.model_b)
        } else if self.model_b == model {
            Some(&self.model_a)
        } else {
            None
        }
    }
}

/// In-memory ledger of outstanding battles.
#[derive(Debug, Default)]
pub struct BattleLedger {
    entries: Mutex<HashMap<Uuid, PendingBattle>>,
}

impl BattleLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a battle under a fresh token and returns the token.
    pub fn register(&self, battle: PendingBattle) -> Uuid {
        let token = Uuid::new_v4();
        self.entries.lock().insert(token, battle);
        token
    }

    /// Atomically pops the battle for `token`. The first caller wins; any
    /// later call with the same token gets `None`.
    pub fn take(&self, token: &Uuid) -> Option<PendingBattle> {
        self.entries.lock().remove(token)
    }

    /// Number of battles still awaiting a result.
    pub fn pending(&self) -> usize {
        self.entries.lock().len()
    }
}
