//! Configuration management for movielens-query.
//!
//! Handles loading configuration from a TOML file. Every field has a default,
//! so a missing file or a partial file is fine. Command-line flags override
//! whatever is loaded here.

use crate::error::{AppError, Result};
use crate::ingest::DEFAULT_SEED;
use crate::query::DEFAULT_MAX_ROWS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// SQLite database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// CSV ingestion settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Named query file settings.
    #[serde(default)]
    pub queries: QueriesConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path of the database file; created on first use.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("movielens_small.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// CSV ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Directory holding movies.csv, ratings.csv, links.csv and tags.csv.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Also generate the synthetic users table after loading.
    #[serde(default)]
    pub with_users: bool,

    /// Seed for synthetic user generation.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/ml-latest-small")
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            with_users: false,
            seed: default_seed(),
        }
    }
}

/// Named query file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueriesConfig {
    /// File containing `-- QUERY: <name>` blocks.
    #[serde(default = "default_queries_file")]
    pub file: PathBuf,

    /// Rows printed per result table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_queries_file() -> PathBuf {
    PathBuf::from("queries.sql")
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            file: default_queries_file(),
            max_rows: default_max_rows(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("movielens-query")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file, or defaults if it does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
