//! Database abstraction layer.
//!
//! Provides a trait-based interface for statement execution so the query
//! runner can be driven by SQLite or by an in-memory mock.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with AppError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a single parameterless statement and returns all of its rows
    /// together with the column metadata reported by the store.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Executes a script of one or more statements, discarding any rows.
    async fn execute_batch(&self, sql: &str) -> Result<()>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
