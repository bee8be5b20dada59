//! MovieLens ingestion.
//!
//! Creates the fixed schema, loads the `ml-latest-small` CSV files and
//! optionally generates a synthetic `users` table. Everything here only
//! populates the store; the query runner never depends on it.

pub mod loader;
pub mod schema;
pub mod users;

pub use loader::{load_csv, ColumnKind, TableSpec, MOVIELENS_TABLES};
pub use schema::create_tables;
pub use users::{create_users_table, generate_users, SyntheticUser, DEFAULT_SEED};

use crate::error::Result;
use sqlx::sqlite::SqlitePool;
use std::path::Path;

/// Row counts per table after a full load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<(&'static str, usize)>,
}

impl LoadSummary {
    /// Total rows inserted across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, n)| n).sum()
    }

    /// Rows inserted into `table`, if it was loaded.
    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, n)| *n)
    }
}

/// Recreates the MovieLens tables and loads every CSV from `data_dir`.
///
/// Stops at the first missing or malformed file. Tables loaded before the
/// failure keep their rows.
pub async fn load_all(pool: &SqlitePool, data_dir: &Path) -> Result<LoadSummary> {
    create_tables(pool).await?;

    let mut summary = LoadSummary::default();
    for spec in &MOVIELENS_TABLES {
        let rows = load_csv(pool, &data_dir.join(spec.file), spec).await?;
        summary.tables.push((spec.table, rows));
    }
    Ok(summary)
}
