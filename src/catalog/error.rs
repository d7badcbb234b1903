use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading the content catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse joke catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("roster {path} contains no model identifiers")]
    EmptyRoster { path: PathBuf },
}
