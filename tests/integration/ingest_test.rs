//! MovieLens ingestion integration tests.
//!
//! Loads small CSV fixtures into a database file and queries the result.

use movielens_query::db::{DatabaseClient, SqliteClient, Value};
use movielens_query::error::AppError;
use movielens_query::ingest::{self, DEFAULT_SEED};
use movielens_query::query::NamedQuery;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const MOVIES_CSV: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,\"American President, The (1995)\",Comedy|Drama|Romance
";

const RATINGS_CSV: &str = "\
userId,movieId,rating,timestamp
1,1,4.0,964982703
1,3,4.0,964981247
2,1,5.0,964982224
2,2,3.5,964983815
7,2,2.0,964982931
";

const LINKS_CSV: &str = "\
movieId,imdbId,tmdbId
1,0114709,862
2,0113497,8844
3,0112346,
";

const TAGS_CSV: &str = "\
userId,movieId,tag,timestamp
2,1,pixar,1445714994
7,3,politics,1445714996
";

fn write_dataset(dir: &Path) {
    fs::write(dir.join("movies.csv"), MOVIES_CSV).unwrap();
    fs::write(dir.join("ratings.csv"), RATINGS_CSV).unwrap();
    fs::write(dir.join("links.csv"), LINKS_CSV).unwrap();
    fs::write(dir.join("tags.csv"), TAGS_CSV).unwrap();
}

#[tokio::test]
async fn test_load_all_tables() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let client = SqliteClient::connect(&dir.path().join("ml.db")).await.unwrap();

    let summary = ingest::load_all(client.pool(), dir.path()).await.unwrap();

    assert_eq!(
        summary.tables,
        vec![("movies", 3), ("ratings", 5), ("links", 3), ("tags", 2)]
    );
    assert_eq!(summary.total_rows(), 13);

    let title = client
        .execute_query("SELECT title FROM movies WHERE movieId = 3")
        .await
        .unwrap();
    assert_eq!(
        title.rows[0][0],
        Value::from("American President, The (1995)")
    );

    let links = client
        .execute_query("SELECT imdbId, tmdbId FROM links WHERE movieId = 3")
        .await
        .unwrap();
    assert_eq!(links.rows[0], vec![Value::from("0112346"), Value::from("")]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_reload_replaces_rows() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let client = SqliteClient::open_in_memory().await.unwrap();

    ingest::load_all(client.pool(), dir.path()).await.unwrap();
    ingest::load_all(client.pool(), dir.path()).await.unwrap();

    let count = client
        .execute_query("SELECT COUNT(*) FROM ratings")
        .await
        .unwrap();
    assert_eq!(count.rows[0][0], Value::Int(5));
}

#[tokio::test]
async fn test_missing_csv_is_reported() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    fs::remove_file(dir.path().join("tags.csv")).unwrap();
    let client = SqliteClient::open_in_memory().await.unwrap();

    let err = ingest::load_all(client.pool(), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingFile { .. }));
    assert!(err.to_string().contains("tags.csv"));
}

#[tokio::test]
async fn test_malformed_number_names_the_line() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating,timestamp\n1,1,great,964982703\n",
    )
    .unwrap();
    let client = SqliteClient::open_in_memory().await.unwrap();

    let err = ingest::load_all(client.pool(), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Ingest(_)));
    assert!(err.to_string().contains("ratings.csv:2"));
    assert!(err.to_string().contains("rating"));
}

#[tokio::test]
async fn test_users_follow_ratings() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let client = SqliteClient::open_in_memory().await.unwrap();
    ingest::load_all(client.pool(), dir.path()).await.unwrap();

    let created = ingest::create_users_table(client.pool(), DEFAULT_SEED)
        .await
        .unwrap();
    assert_eq!(created, 3);

    let first = client
        .execute_query("SELECT userId, name, age, gender FROM users ORDER BY userId")
        .await
        .unwrap();
    let ids: Vec<&Value> = first.rows.iter().map(|row| &row[0]).collect();
    assert_eq!(ids, vec![&Value::Int(1), &Value::Int(2), &Value::Int(7)]);

    // Same seed, same users.
    ingest::create_users_table(client.pool(), DEFAULT_SEED)
        .await
        .unwrap();
    let second = client
        .execute_query("SELECT userId, name, age, gender FROM users ORDER BY userId")
        .await
        .unwrap();
    assert_eq!(first.rows, second.rows);
}

#[tokio::test]
async fn test_named_query_over_loaded_data() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    let queries = dir.path().join("queries.sql");
    fs::write(
        &queries,
        "\
-- QUERY: movies_avg_rating
SELECT m.title, ROUND(AVG(r.rating), 2) AS avg_rating
FROM movies m
JOIN ratings r ON r.movieId = m.movieId
GROUP BY m.movieId
ORDER BY avg_rating DESC, m.title;
",
    )
    .unwrap();
    let client = SqliteClient::open_in_memory().await.unwrap();
    ingest::load_all(client.pool(), dir.path()).await.unwrap();

    let lines = NamedQuery::new(&queries, "movies_avg_rating")
        .with_description("Average rating per movie:")
        .render(&client, 2)
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![
            "Average rating per movie:",
            "Total rows: 3",
            "title                          | avg_rating",
            "-------------------------------+-----------",
            "Toy Story (1995)               |        4.5",
            "American President, The (1995) |        4.0",
            "(2 of 3 rows shown)",
        ]
    );
}
