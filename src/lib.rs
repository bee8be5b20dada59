//! movielens-query - load MovieLens CSVs into SQLite and run named SQL queries.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod query;
