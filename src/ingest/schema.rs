//! MovieLens table definitions.

use crate::error::{AppError, Result};
use sqlx::sqlite::SqlitePool;
use tracing::info;

const MOVIELENS_DDL: &str = r#"
DROP TABLE IF EXISTS movies;
DROP TABLE IF EXISTS ratings;
DROP TABLE IF EXISTS links;
DROP TABLE IF EXISTS tags;

CREATE TABLE movies (
    movieId INTEGER PRIMARY KEY,
    title   TEXT NOT NULL,
    genres  TEXT NOT NULL
);

CREATE TABLE ratings (
    userId    INTEGER NOT NULL,
    movieId   INTEGER NOT NULL,
    rating    REAL    NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE TABLE links (
    movieId INTEGER PRIMARY KEY,
    imdbId  TEXT,
    tmdbId  TEXT
);

CREATE TABLE tags (
    userId    INTEGER NOT NULL,
    movieId   INTEGER NOT NULL,
    tag       TEXT,
    timestamp INTEGER NOT NULL
);
"#;

const USERS_DDL: &str = r#"
DROP TABLE IF EXISTS users;

CREATE TABLE users (
    userId INTEGER PRIMARY KEY,
    name   TEXT    NOT NULL,
    age    INTEGER NOT NULL,
    gender TEXT    NOT NULL
);
"#;

/// Drops and recreates the movies, ratings, links and tags tables.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(MOVIELENS_DDL)
        .execute(pool)
        .await
        .map_err(|e| AppError::ingest(format!("Failed to create MovieLens tables: {e}")))?;
    info!("Created MovieLens tables");
    Ok(())
}

/// Drops and recreates the users table.
pub async fn create_users_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(USERS_DDL)
        .execute(pool)
        .await
        .map_err(|e| AppError::ingest(format!("Failed to create users table: {e}")))?;
    Ok(())
}
