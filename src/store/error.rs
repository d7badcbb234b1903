use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the rating store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to acquire state lock: {0}")]
    Lock(#[source] std::io::Error),

    #[error("failed to read state file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("state file {path} is not a valid rating document: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to persist state file {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode rating state: {0}")]
    Encode(#[source] serde_json::Error),
}
