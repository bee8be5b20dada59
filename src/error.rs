//! Error types for movielens-query.
//!
//! Defines the main error enum used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for movielens-query operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// A `-- QUERY:` marker name appeared twice in one query file.
    #[error("Duplicate QUERY name: {name}")]
    DuplicateQueryName { name: String },

    /// The requested query name is not defined in the query file.
    #[error("Query '{name}' not found in {}. Available: {}", path.display(), format_available(available))]
    QueryNotFound {
        name: String,
        path: PathBuf,
        /// Names defined in the file, sorted alphabetically.
        available: Vec<String>,
    },

    /// An input file (query file, CSV) does not exist.
    #[error("Missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Other filesystem failures.
    #[error("IO error: {0}")]
    Io(String),

    /// Database connection errors (bad path, permissions, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution errors reported by the store.
    #[error("Query error: {0}")]
    Query(String),

    /// CSV loading and table population errors.
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

impl AppError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an ingest error with the given message.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a missing-file error for the given path.
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DuplicateQueryName { .. } => "Parse Error",
            Self::QueryNotFound { .. } => "Lookup Error",
            Self::MissingFile { .. } | Self::Io(_) => "File Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Ingest(_) => "Ingest Error",
            Self::Config(_) => "Configuration Error",
        }
    }

    /// Returns true for failures raised by the store while executing a statement.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Returns the message without the category prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Io(msg)
            | Self::Connection(msg)
            | Self::Query(msg)
            | Self::Ingest(msg)
            | Self::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        Self::Ingest(e.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
