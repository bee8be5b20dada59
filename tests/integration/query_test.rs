//! Named query integration tests.
//!
//! Runs query files end to end against an in-memory SQLite database.

use movielens_query::db::{DatabaseClient, SqliteClient, Value};
use movielens_query::error::AppError;
use movielens_query::query::NamedQuery;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::{tempdir, TempDir};

const QUERIES: &str = "\
-- QUERY: all_movies
SELECT movieId, title
FROM movies
ORDER BY movieId;

-- QUERY: avg_rating
SELECT AVG(rating) AS avg_rating FROM movies WHERE movieId IN (1, 2);

-- QUERY: whole_rating
SELECT rating FROM movies WHERE movieId = 1;

-- QUERY: no_movies
SELECT movieId FROM movies WHERE movieId < 0;

-- QUERY: broken
SELECT * FROM no_such_table;

-- QUERY: make_table
CREATE TABLE scratch (x INTEGER);
";

async fn seeded_client() -> SqliteClient {
    let client = SqliteClient::open_in_memory().await.unwrap();
    client
        .execute_batch(
            "CREATE TABLE movies (movieId INTEGER PRIMARY KEY, title TEXT, rating REAL);
             INSERT INTO movies VALUES
                (1, 'Movie 1', 4.0),
                (2, 'Movie 2', 5.0),
                (3, 'Movie 3', 3.5),
                (4, 'Movie 4', 2.0),
                (5, 'Movie 5', 1.5),
                (6, 'A title much wider than the others', 3.0),
                (7, 'Movie 7', 4.5);",
        )
        .await
        .unwrap();
    client
}

/// Writes `text` to a query file inside a fresh temporary directory.
fn query_file(text: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queries.sql");
    fs::write(&path, text).unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_render_truncates_to_five_rows() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);

    let lines = NamedQuery::new(&path, "all_movies")
        .with_description("All movies:")
        .render(&client, 5)
        .await
        .unwrap();

    // Row 6 is hidden, so its long title does not widen the column.
    assert_eq!(
        lines,
        vec![
            "All movies:",
            "Total rows: 7",
            "movieId | title  ",
            "--------+--------",
            "      1 | Movie 1",
            "      2 | Movie 2",
            "      3 | Movie 3",
            "      4 | Movie 4",
            "      5 | Movie 5",
            "(5 of 7 rows shown)",
        ]
    );
}

#[tokio::test]
async fn test_render_all_rows_when_under_cap() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);

    let lines = NamedQuery::new(&path, "all_movies")
        .render(&client, 10)
        .await
        .unwrap();

    assert_eq!(lines[0], "Total rows: 7");
    assert_eq!(lines[1], format!("movieId | {:<34}", "title"));
    assert_eq!(lines.last().unwrap(), "(7 rows)");
    assert_eq!(lines.len(), 1 + 2 + 7 + 1);
}

#[tokio::test]
async fn test_float_cells() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);

    let avg = NamedQuery::new(&path, "avg_rating")
        .render(&client, 5)
        .await
        .unwrap();
    assert_eq!(
        avg,
        vec!["Total rows: 1", "avg_rating", "----------", "       4.5", "(1 rows)"]
    );

    let whole = NamedQuery::new(&path, "whole_rating")
        .run(&client)
        .await
        .unwrap();
    assert_eq!(whole.rows[0][0], Value::Float(4.0));
    assert_eq!(whole.rows[0][0].to_display_string(), "4.0");
}

#[tokio::test]
async fn test_empty_result_keeps_header() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);

    let lines = NamedQuery::new(&path, "no_movies")
        .render(&client, 5)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Total rows: 0", "movieId", "-------", "(0 rows)"]);
}

#[tokio::test]
async fn test_sql_error_becomes_single_line() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);
    let query = NamedQuery::new(&path, "broken");

    let lines = query.render(&client, 5).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[SQL error] "));
    assert!(lines[0].contains("no_such_table"));

    let err = query.run(&client).await.unwrap_err();
    assert!(err.is_execution_error());
}

#[tokio::test]
async fn test_statement_without_result_set() {
    let client = seeded_client().await;
    let (_dir, path) = query_file(QUERIES);

    let lines = NamedQuery::new(&path, "make_table")
        .with_description("Scratch table:")
        .render(&client, 5)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Scratch table:", "(No result set)"]);

    let check = client
        .execute_query("SELECT COUNT(*) AS n FROM scratch")
        .await
        .unwrap();
    assert_eq!(check.rows[0][0], Value::Int(0));
}

#[tokio::test]
async fn test_unknown_name_lists_available() {
    let client = seeded_client().await;
    let (_dir, path) = query_file("-- QUERY: b\nSELECT 2;\n-- QUERY: a\nSELECT 1;\n");

    let err = NamedQuery::new(&path, "c")
        .render(&client, 5)
        .await
        .unwrap_err();

    match &err {
        AppError::QueryNotFound { name, available, .. } => {
            assert_eq!(name, "c");
            assert_eq!(available, &vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("expected QueryNotFound, got {other:?}"),
    }
    assert!(err.to_string().ends_with("Available: a, b"));
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let client = seeded_client().await;
    let (_dir, path) = query_file("-- QUERY: a\nSELECT 1;\n-- QUERY: a\nSELECT 2;\n");

    let err = NamedQuery::new(&path, "a").run(&client).await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateQueryName { ref name } if name == "a"));
}

#[tokio::test]
async fn test_missing_query_file() {
    let client = seeded_client().await;
    let dir = tempdir().unwrap();

    let err = NamedQuery::new(dir.path().join("absent.sql"), "a")
        .render(&client, 5)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingFile { .. }));
}

#[tokio::test]
async fn test_file_is_reread_on_each_run() {
    let client = seeded_client().await;
    let (_dir, path) = query_file("-- QUERY: q\nSELECT 1 AS v;\n");
    let query = NamedQuery::new(&path, "q");

    let first = query.run(&client).await.unwrap();
    fs::write(&path, "-- QUERY: q\nSELECT 2 AS v;\n").unwrap();
    let second = query.run(&client).await.unwrap();

    assert_eq!(first.rows[0][0], Value::Int(1));
    assert_eq!(second.rows[0][0], Value::Int(2));
}
