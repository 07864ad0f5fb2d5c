//! Runtime configuration
//!
//! Command-line flags and environment variables (parsed in `main`) override
//! platform defaults from [`directories::ProjectDirs`].

use std::path::{Path, PathBuf};

const APP_NAME: &str = "higher_lower";

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "higher_lower.db";

/// Log file name inside the log directory
pub const LOG_FILE: &str = "higher_lower.log";

/// Default tracing filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where scores and reference data live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Sqlite(PathBuf),
    /// Nothing survives the process
    InMemory,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub player: Option<String>,
    pub in_memory: bool,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: Storage,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub player: Option<String>,
}

impl AppConfig {
    /// Fill anything not overridden from the platform directories
    #[must_use]
    pub fn resolve(overrides: Overrides) -> Self {
        let storage = if overrides.in_memory {
            Storage::InMemory
        } else {
            Storage::Sqlite(
                overrides
                    .database
                    .unwrap_or_else(|| data_dir().join(DATABASE_FILE)),
            )
        };

        Self {
            storage,
            log_dir: overrides.log_dir.unwrap_or_else(log_dir),
            log_level: overrides
                .log_level
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            player: overrides
                .player
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        }
    }

    /// Database path, if the storage is file-backed
    #[must_use]
    pub fn database_path(&self) -> Option<&Path> {
        match &self.storage {
            Storage::Sqlite(path) => Some(path),
            Storage::InMemory => None,
        }
    }
}

/// Platform data directory
///
/// - Linux: `~/.local/share/higher_lower`
/// - macOS: `~/Library/Application Support/higher_lower`
/// - Windows: `%APPDATA%\higher_lower`
/// - Fallback: `./data`
#[must_use]
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map_or_else(|| PathBuf::from("./data"), |dirs| dirs.data_dir().to_path_buf())
}

/// Platform log directory, under the cache directory
#[must_use]
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map_or_else(
            || std::env::temp_dir().join(APP_NAME),
            |dirs| dirs.cache_dir().to_path_buf(),
        )
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::resolve(Overrides {
            database: Some(PathBuf::from("/tmp/scores.db")),
            log_dir: Some(PathBuf::from("/tmp/logs")),
            log_level: Some("debug".to_string()),
            player: Some("  aino ".to_string()),
            in_memory: false,
        });

        assert_eq!(config.storage, Storage::Sqlite(PathBuf::from("/tmp/scores.db")));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.player.as_deref(), Some("aino"));
    }

    #[test]
    fn defaults_fill_gaps() {
        let config = AppConfig::resolve(Overrides::default());

        let path = config.database_path().unwrap();
        assert!(path.ends_with(DATABASE_FILE));
        assert!(config.log_dir.ends_with("logs"));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.player, None);
    }

    #[test]
    fn in_memory_ignores_database_path() {
        let config = AppConfig::resolve(Overrides {
            database: Some(PathBuf::from("ignored.db")),
            in_memory: true,
            ..Overrides::default()
        });
        assert_eq!(config.storage, Storage::InMemory);
        assert_eq!(config.database_path(), None);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = AppConfig::resolve(Overrides {
            log_level: Some("  ".to_string()),
            player: Some(String::new()),
            ..Overrides::default()
        });
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.player, None);
    }
}
