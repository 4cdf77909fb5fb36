//! Store configuration.
//!
//! # Responsibility
//! - Carry the database location and connection tuning into `open_db`.
//! - Resolve an unset path to the default database file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Database file used when no path is configured.
pub const DEFAULT_DB_FILE_PATH: &str = "./tracker.db";
/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Configuration for opening a parcel store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Path to an existing SQLite database file. Empty means default.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// How long a statement waits on a locked database.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns the configured path, or `DEFAULT_DB_FILE_PATH` when empty.
    pub fn resolved_path(&self) -> &Path {
        if self.path.as_os_str().is_empty() {
            Path::new(DEFAULT_DB_FILE_PATH)
        } else {
            self.path.as_path()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE_PATH)
}

const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}
