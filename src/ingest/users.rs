//! Synthetic `users` dimension table.
//!
//! MovieLens ships no user attributes, so one fake user is generated for
//! every distinct `userId` in `ratings`. Generation is seeded and therefore
//! reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::sqlite::SqlitePool;
use tracing::info;

use super::schema::create_users_schema;
use crate::error::{AppError, Result};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack", "Kate",
    "Leo", "Maya", "Noah", "Olivia", "Paul", "Quinn", "Rose", "Sam", "Tina", "Uma", "Victor",
    "Wendy", "Xavier", "Yara", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin",
];

const GENDERS: &[&str] = &["M", "F", "Other"];

/// Inclusive age range, chosen so that both under- and over-25 users exist.
const MIN_AGE: i64 = 15;
const MAX_AGE: i64 = 65;

/// One generated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticUser {
    pub user_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
}

/// Generates one user per id, in the order given.
pub fn generate_users(user_ids: &[i64], seed: u64) -> Vec<SyntheticUser> {
    let mut rng = StdRng::seed_from_u64(seed);

    user_ids
        .iter()
        .map(|&user_id| {
            let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Anon");
            let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("User");
            let age = rng.gen_range(MIN_AGE..=MAX_AGE);
            let gender = GENDERS.choose(&mut rng).copied().unwrap_or("Other");
            SyntheticUser {
                user_id,
                name: format!("{first} {last}"),
                age,
                gender: gender.to_string(),
            }
        })
        .collect()
}

/// Recreates `users` from the distinct user ids in `ratings`.
/// Returns the number of users inserted.
pub async fn create_users_table(pool: &SqlitePool, seed: u64) -> Result<usize> {
    create_users_schema(pool).await?;

    let user_ids: Vec<i64> = sqlx::query_scalar("SELECT DISTINCT userId FROM ratings ORDER BY userId")
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::ingest(format!("Failed to read user ids from ratings: {e}")))?;

    let users = generate_users(&user_ids, seed);

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::ingest(format!("Failed to begin transaction: {e}")))?;

    for user in &users {
        sqlx::query("INSERT INTO users (userId, name, age, gender) VALUES (?, ?, ?, ?)")
            .bind(user.user_id)
            .bind(user.name.as_str())
            .bind(user.age)
            .bind(user.gender.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::ingest(format!("Failed to insert user {}: {e}", user.user_id)))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::ingest(format!("Failed to commit users: {e}")))?;

    info!("Created users table with {} sample users", users.len());
    Ok(users.len())
}
