//! Configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `TASKDB_DATABASE`: SQLite database file (default: `<data dir>/taskdb/taskdb.db`)
//! - `TASKDB_LOG_DIR`: directory for the log file (default: `<data dir>/taskdb/logs`)
//! - `RUST_LOG`: log level, read by the binary's logger
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;

/// Environment variable naming the database file.
pub const DATABASE_VAR: &str = "TASKDB_DATABASE";

/// Environment variable naming the log directory.
pub const LOG_DIR_VAR: &str = "TASKDB_LOG_DIR";

const APP_DIR: &str = "taskdb";
const DB_FILE: &str = "taskdb.db";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Directory the log file is written to
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let app_dir = default_app_dir();

        let database_path = lookup(DATABASE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir.join(DB_FILE));

        let log_dir = lookup(LOG_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir.join("logs"));

        Self { database_path, log_dir }
    }

    /// Replace the database path.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn default_app_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
