/// Runtime configuration
///
/// Values come from the process environment, optionally seeded from a `.env`
/// file in the current directory.

use crate::error::{PantryError, Result};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable holding the SQLite database path
pub const DATABASE_PATH_VAR: &str = "PANTRY_DATABASE_PATH";

/// Environment variable holding the pool size
pub const MAX_CONNECTIONS_VAR: &str = "PANTRY_MAX_CONNECTIONS";

/// Default number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl Config {
    /// Build a config for an explicit database file with default pool size
    pub fn new<P: Into<PathBuf>>(database_path: P) -> Self {
        Self {
            database_path: database_path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Load configuration from `.env` and the environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded .env from {}", path.display());
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(DATABASE_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                PantryError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    MAX_CONNECTIONS_VAR, raw
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_path,
            max_connections,
        })
    }
}

/// `~/.pantry/pantry.db`
pub fn default_database_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PantryError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".pantry").join("pantry.db"))
}
