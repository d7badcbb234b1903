//! Durable rating store.
//!
//! The full rating state lives in one JSON document on disk. Reads load a
//! snapshot under a shared lock; mutations run under an exclusive lock as
//! load → mutate → persist, so concurrent writers never lose updates. The
//! persisted write goes through a temp file and rename, and every load
//! backfills roster models that the document does not know about yet.

pub mod error;
pub mod lock;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use lock::{FileLock, ProcessLock, StateLock};

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LockMode;

/// Rating every model starts from.
pub const INITIAL_RATING: f64 = 1500.0;

const TEMP_EXTENSION: &str = "json.tmp";
const LOCK_EXTENSION: &str = "lock";

/// Full durable state: per-model ratings and vote counts plus the global
/// vote counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingState {
    pub ratings: HashMap<String, f64>,
    pub votes: HashMap<String, u64>,
    pub total_votes: u64,
}

impl RatingState {
    /// Defaults any roster model absent from the document, so the store
    /// self-heals when the roster grows.
    pub fn backfill(&mut self, roster: &[String]) {
        for model in roster {
            self.ratings
                .entry(model.clone())
                .or_insert(INITIAL_RATING);
            self.votes.entry(model.clone()).or_insert(0);
        }
    }
}

/// On-disk document schema. The legacy format is the bare ratings map; it
/// migrates to the current shape at load time.
#[derive(Deserialize)]
#[serde(untagged)]
enum StateDocument {
    Current {
        ratings: HashMap<String, f64>,
        #[serde(default)]
        votes: HashMap<String, u64>,
        #[serde(default)]
        total_votes: u64,
    },
    Legacy(HashMap<String, f64>),
}

impl From<StateDocument> for RatingState {
    fn from(doc: StateDocument) -> Self {
        match doc {
            StateDocument::Current {
                ratings,
                votes,
                total_votes,
            } => Self {
                ratings,
                votes,
                total_votes,
            },
            StateDocument::Legacy(ratings) => Self {
                ratings,
                ..Self::default()
            },
        }
    }
}

/// Durable, lock-guarded rating store.
pub struct RatingStore {
    path: PathBuf,
    roster: Vec<String>,
    lock: Box<dyn StateLock>,
}

impl std::fmt::Debug for RatingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingStore")
            .field("path", &self.path)
            .field("roster", &self.roster.len())
            .field("lock", &self.lock)
            .finish()
    }
}

impl RatingStore {
    /// Creates a store over `path`, picking the lock implementation by mode.
    pub fn new(path: PathBuf, roster: Vec<String>, mode: LockMode) -> Self {
        let lock: Box<dyn StateLock> = match mode {
            LockMode::File => Box::new(FileLock::new(path.with_extension(LOCK_EXTENSION))),
            LockMode::Process => Box::new(ProcessLock::new()),
        };
        Self::with_lock(path, roster, lock)
    }

    /// Creates a store with an explicit lock implementation.
    pub fn with_lock(path: PathBuf, roster: Vec<String>, lock: Box<dyn StateLock>) -> Self {
        Self { path, roster, lock }
    }

    /// Path of the persisted state document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads a snapshot of the current state under a shared lock.
    pub fn read(&self) -> Result<RatingState, StoreError> {
        let _guard = self.lock.shared()?;
        self.load_unlocked()
    }

    /// Runs `mutator` against the current state under an exclusive lock and
    /// persists the result before returning it.
    ///
    /// The whole load → mutate → persist sequence holds the exclusive lock,
    /// so no reader can observe a partial write and no concurrent writer can
    /// interleave.
    pub fn update<T>(
        &self,
        mutator: impl FnOnce(&mut RatingState) -> T,
    ) -> Result<(RatingState, T), StoreError> {
        let _guard = self.lock.exclusive()?;
        let mut state = self.load_unlocked()?;
        let result = mutator(&mut state);
        self.persist_unlocked(&state)?;
        Ok((state, result))
    }

    fn load_unlocked(&self) -> Result<RatingState, StoreError> {
        let mut state = if self.path.exists() {
            let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

            let doc: StateDocument =
                serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                    path: self.path.clone(),
                    source,
                })?;

            RatingState::from(doc)
        } else {
            debug!(path = %self.path.display(), "state file absent, starting fresh");
            RatingState::default()
        };

        state.backfill(&self.roster);
        Ok(state)
    }

    // Temp-file + rename so a crash mid-write never leaves a truncated
    // document behind.
    fn persist_unlocked(&self, state: &RatingState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state).map_err(StoreError::Encode)?;

        let temp_path = self.path.with_extension(TEMP_EXTENSION);

        {
            let mut file = File::create(&temp_path).map_err(|e| self.persist_err(e))?;
            file.write_all(&bytes).map_err(|e| self.persist_err(e))?;
            file.sync_all().map_err(|e| self.persist_err(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.persist_err(e))
    }

    fn persist_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}
