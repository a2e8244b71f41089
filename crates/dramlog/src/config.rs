//! # Configuration
//!
//! Dramlog configuration is managed by [`confique`], which handles layered loading from a
//! TOML file, environment variables, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `DRAMLOG_DATABASE_PATH`, `DRAMLOG_IMAGE_CACHE_CAPACITY`,
//!    `DRAMLOG_FETCH_TIMEOUT_SECS`.
//! 2. **Config file**: `dramlog.toml` in the directory passed to [`DiaryConfig::load`].
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `database_path` | platform data dir + `diary.sqlite3` | Where the diary is stored |
//! | `image_cache_capacity` | `128` | Decoded images kept in memory |
//! | `fetch_timeout_secs` | `30` | Timeout for remote image fetches |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DiaryError, Result};

pub const CONFIG_FILE_NAME: &str = "dramlog.toml";
pub const DATABASE_FILE_NAME: &str = "diary.sqlite3";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiaryConfig {
    /// Path of the SQLite database. When absent, the platform data directory is used.
    #[config(env = "DRAMLOG_DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Number of decoded images kept in memory.
    #[config(default = 128, env = "DRAMLOG_IMAGE_CACHE_CAPACITY")]
    pub image_cache_capacity: usize,

    /// Timeout for remote image fetches, in seconds.
    #[config(default = 30, env = "DRAMLOG_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            image_cache_capacity: 128,
            fetch_timeout_secs: 30,
        }
    }
}

impl DiaryConfig {
    /// Loads configuration from the environment and `dir/dramlog.toml` (if present).
    pub fn load(dir: &Path) -> Result<Self> {
        let config = Self::builder()
            .env()
            .file(dir.join(CONFIG_FILE_NAME))
            .load()?;
        Ok(config)
    }

    /// The configured database path, or the platform default.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        ProjectDirs::from("com", "dramlog", "dramlog")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(DiaryError::InvalidContext)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiaryConfig::default();
        assert_eq!(config.database_path, None);
        assert_eq!(config.image_cache_capacity, 128);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = DiaryConfig {
            database_path: Some(PathBuf::from("/tmp/diary.db")),
            ..Default::default()
        };
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/diary.db")
        );
    }

    #[test]
    fn test_load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "database_path = \"/data/notes.sqlite3\"\nimage_cache_capacity = 8\n",
        )
        .unwrap();

        let config = DiaryConfig::load(dir.path()).unwrap();
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/data/notes.sqlite3"))
        );
        assert_eq!(config.image_cache_capacity, 8);
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DiaryConfig::load(dir.path()).unwrap();
        assert_eq!(config.image_cache_capacity, 128);
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = DiaryConfig {
            database_path: Some(PathBuf::from("diary.sqlite3")),
            ..Default::default()
        };
        let rendered = toml::to_string(&config).unwrap();
        assert!(rendered.contains("image_cache_capacity = 128"));
        let parsed: DiaryConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
