//! CSV loading into the MovieLens tables.
//!
//! Each CSV file is mapped onto one table through a [`TableSpec`]. Columns
//! are located by header name, so the file may carry extra columns or list
//! them in another order.

use std::path::Path;

use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool};
use sqlx::query::Query;
use tracing::{debug, info};

use crate::db::Value;
use crate::error::{AppError, Result};

/// How a CSV cell is converted before insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    /// Stored verbatim. Used for ids like `imdbId` whose leading zeros matter.
    Text,
}

/// Mapping from one CSV file to one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub file: &'static str,
    pub columns: &'static [(&'static str, ColumnKind)],
}

pub const MOVIES: TableSpec = TableSpec {
    table: "movies",
    file: "movies.csv",
    columns: &[
        ("movieId", ColumnKind::Integer),
        ("title", ColumnKind::Text),
        ("genres", ColumnKind::Text),
    ],
};

pub const RATINGS: TableSpec = TableSpec {
    table: "ratings",
    file: "ratings.csv",
    columns: &[
        ("userId", ColumnKind::Integer),
        ("movieId", ColumnKind::Integer),
        ("rating", ColumnKind::Real),
        ("timestamp", ColumnKind::Integer),
    ],
};

pub const LINKS: TableSpec = TableSpec {
    table: "links",
    file: "links.csv",
    columns: &[
        ("movieId", ColumnKind::Integer),
        ("imdbId", ColumnKind::Text),
        ("tmdbId", ColumnKind::Text),
    ],
};

pub const TAGS: TableSpec = TableSpec {
    table: "tags",
    file: "tags.csv",
    columns: &[
        ("userId", ColumnKind::Integer),
        ("movieId", ColumnKind::Integer),
        ("tag", ColumnKind::Text),
        ("timestamp", ColumnKind::Integer),
    ],
};

/// The four MovieLens files, in load order.
pub const MOVIELENS_TABLES: [TableSpec; 4] = [MOVIES, RATINGS, LINKS, TAGS];

impl TableSpec {
    fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|(name, _)| *name).collect();
        let placeholders = vec!["?"; names.len()].join(",");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(","),
            placeholders
        )
    }
}

/// Reads `path` and inserts every record into `spec.table` in one
/// transaction. Returns the number of rows inserted.
pub async fn load_csv(pool: &SqlitePool, path: &Path, spec: &TableSpec) -> Result<usize> {
    if !path.exists() {
        return Err(AppError::missing_file(path));
    }

    let rows = read_rows(path, spec)?;
    debug!("Read {} records from {}", rows.len(), path.display());

    let insert_sql = spec.insert_sql();
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::ingest(format!("Failed to begin transaction: {e}")))?;

    for row in &rows {
        let query = row
            .iter()
            .fold(sqlx::query(&insert_sql), |query, value| bind_value(query, value));
        query.execute(&mut *tx).await.map_err(|e| {
            AppError::ingest(format!("Failed to insert into {}: {e}", spec.table))
        })?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::ingest(format!("Failed to commit {}: {e}", spec.table)))?;

    info!("Loaded {} rows into {}", rows.len(), spec.table);
    Ok(rows.len())
}

/// Parses the CSV into typed rows following the column order of `spec`.
fn read_rows(path: &Path, spec: &TableSpec) -> Result<Vec<Vec<Value>>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let positions: Vec<Option<usize>> = spec
        .columns
        .iter()
        .map(|(name, _)| headers.iter().position(|h| h == *name))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row = spec
            .columns
            .iter()
            .zip(&positions)
            .map(|(&(name, kind), position)| {
                let raw = position.and_then(|i| record.get(i));
                convert_cell(raw, kind).map_err(|msg| {
                    AppError::ingest(format!(
                        "{}:{line}: column {name}: {msg}",
                        path.display()
                    ))
                })
            })
            .collect::<Result<Vec<Value>>>()?;
        rows.push(row);
    }

    Ok(rows)
}

/// Absent columns become NULL, as do empty numeric cells. Text is kept as is.
fn convert_cell(raw: Option<&str>, kind: ColumnKind) -> std::result::Result<Value, String> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };

    match kind {
        ColumnKind::Text => Ok(Value::String(raw.to_string())),
        _ if raw.trim().is_empty() => Ok(Value::Null),
        ColumnKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("invalid integer '{raw}'")),
        ColumnKind::Real => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("invalid number '{raw}'")),
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::String(s) => query.bind(s.clone()),
    }
}
