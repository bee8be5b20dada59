//! Runs a single named query from a query file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::format::ResultTable;
use super::parser::load_named_queries;
use crate::db::{DatabaseClient, QueryResult};
use crate::error::{AppError, Result};

/// A reference to one named block in a query file.
///
/// The file is re-read and re-parsed on every call, so edits to the file are
/// picked up without rebuilding the `NamedQuery`.
#[derive(Debug, Clone)]
pub struct NamedQuery {
    sql_path: PathBuf,
    name: String,
    description: Option<String>,
}

impl NamedQuery {
    /// Creates a query named `name` in the file at `sql_path`.
    pub fn new(sql_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            sql_path: sql_path.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets a line printed above the result table.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_path(&self) -> &Path {
        &self.sql_path
    }

    /// Loads the SQL body for this query from the file.
    pub fn load_sql(&self) -> Result<String> {
        let mut named = load_named_queries(&self.sql_path)?;
        named.remove(&self.name).ok_or_else(|| AppError::QueryNotFound {
            name: self.name.clone(),
            path: self.sql_path.clone(),
            available: named.into_keys().collect(),
        })
    }

    /// Executes the query and returns every row with its column metadata.
    pub async fn run(&self, db: &dyn DatabaseClient) -> Result<QueryResult> {
        let sql = self.load_sql()?;
        debug!(query = %self.name, %sql, "Executing named query");

        let result = db.execute_query(&sql).await?;
        info!(
            query = %self.name,
            rows = result.row_count,
            elapsed_ms = elapsed_ms(result.execution_time),
            "Query complete"
        );
        Ok(result)
    }

    /// Executes the query and renders it as text lines.
    ///
    /// A failure reported by the store becomes a single `[SQL error]` line.
    /// File and lookup failures are returned to the caller.
    pub async fn render(&self, db: &dyn DatabaseClient, max_rows: usize) -> Result<Vec<String>> {
        match self.run(db).await {
            Ok(result) => Ok(ResultTable::new(&result)
                .max_rows(max_rows)
                .render_to_lines(self.description.as_deref())),
            Err(e) if e.is_execution_error() => {
                warn!(query = %self.name, error = %e, "Query failed");
                Ok(vec![format!("[SQL error] {}", e.detail())])
            }
            Err(e) => Err(e),
        }
    }

    /// Executes the query and prints the result table to stdout.
    pub async fn run_and_print(&self, db: &dyn DatabaseClient, max_rows: usize) -> Result<()> {
        for line in self.render(db, max_rows).await? {
            println!("{line}");
        }
        Ok(())
    }
}

/// Milliseconds for log fields, saturating at `u64::MAX`.
fn elapsed_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
