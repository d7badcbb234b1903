//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PUNCHUP_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// How the rating store serializes access to the state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// OS advisory file lock on a sibling `.lock` path. Safe across processes.
    File,
    /// In-process reader-writer lock. Only safe when a single process owns
    /// the state file (useful for tests and embedded deployments).
    Process,
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PUNCHUP_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the content inputs and the persisted Elo state.
    /// Default: `./data`.
    pub data_dir: PathBuf,

    /// State-file locking strategy. Default: [`LockMode::File`].
    pub lock_mode: LockMode,
}

/// Roster CSV filename inside the data directory.
pub const MODELS_FILENAME: &str = "models.csv";

/// Joke catalog filename inside the data directory.
pub const JOKES_FILENAME: &str = "jokes.json";

/// Persisted Elo state filename inside the data directory.
pub const STATE_FILENAME: &str = "elo_state.json";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from("./data"),
            lock_mode: LockMode::File,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PUNCHUP_PORT";
    const ENV_BIND_ADDR: &'static str = "PUNCHUP_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "PUNCHUP_DATA_DIR";
    const ENV_LOCK_MODE: &'static str = "PUNCHUP_LOCK_MODE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let lock_mode = Self::parse_lock_mode_from_env(defaults.lock_mode)?;

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            lock_mode,
        })
    }

    /// Validates that the content inputs exist (does not touch the state file,
    /// which is created on first write).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.data_dir.clone(),
            });
        }
        if !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        for path in [self.models_path(), self.jokes_path()] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path });
            }
        }

        Ok(())
    }

    /// Path to the roster CSV.
    pub fn models_path(&self) -> PathBuf {
        self.data_dir.join(MODELS_FILENAME)
    }

    /// Path to the joke catalog JSON.
    pub fn jokes_path(&self) -> PathBuf {
        self.data_dir.join(JOKES_FILENAME)
    }

    /// Path to the persisted Elo state document.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILENAME)
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_lock_mode_from_env(default: LockMode) -> Result<LockMode, ConfigError> {
        match env::var(Self::ENV_LOCK_MODE) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "file" => Ok(LockMode::File),
                "process" => Ok(LockMode::Process),
                _ => Err(ConfigError::InvalidLockMode { value }),
            },
            Err(_) => Ok(default),
        }
    }
}
