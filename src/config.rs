//! Runtime configuration for the binary
//!
//! The library never reads the environment; only `main` resolves these.

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "CALORIE_TRACKER_DATABASE_PATH";

/// Default log directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "calorie_tracker=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        Self { database_path }
    }
}

/// `data/calorie_tracker.db` under the project root, or next to the binary
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("calorie_tracker.db");
    path
}
