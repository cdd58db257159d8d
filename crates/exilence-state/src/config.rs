//! Runtime configuration.
//!
//! Reads configuration from environment variables:
//! - `EXILENCE_DB_PATH`: SQLite database file path (default: "exilence-next.db")
//! - `EXILENCE_LOG`: tracing filter directive (default: "info")

/// Environment variable naming the database file.
pub const DB_PATH_VAR: &str = "EXILENCE_DB_PATH";
/// Environment variable holding the log filter.
pub const LOG_VAR: &str = "EXILENCE_LOG";

pub const DEFAULT_DB_PATH: &str = "exilence-next.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: DEFAULT_DB_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        AppConfig {
            db_path: get(DB_PATH_VAR, DEFAULT_DB_PATH),
            log_filter: get(LOG_VAR, DEFAULT_LOG_FILTER),
        }
    }

    /// Replaces the database path when `db_path` is given.
    pub fn with_db_path(mut self, db_path: Option<String>) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        self
    }
}
