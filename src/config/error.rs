use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating [`super::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port '{value}': {source}")]
    PortParseError {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("port must be non-zero, got '{value}'")]
    InvalidPort { value: String },

    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("unknown lock mode '{value}' (expected 'file' or 'process')")]
    InvalidLockMode { value: String },

    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
