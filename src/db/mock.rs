//! Mock database clients for testing.
//!
//! Provide canned results (or canned failures) and record every statement
//! they receive, so tests can assert what was or was not executed.

use super::{DatabaseClient, QueryResult};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock database client that returns a predefined result for every query.
#[derive(Default)]
pub struct MockDatabaseClient {
    result: QueryResult,
    executed: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates a mock that answers every query with an empty, column-less result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers every query with `result`.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            result,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, sql: &str) {
        if let Ok(mut guard) = self.executed.lock() {
            guard.push(sql.to_string());
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.record(sql);
        Ok(self.result.clone())
    }

    async fn execute_batch(&self, sql: &str) -> Result<()> {
        self.record(sql);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every statement fails with the given message.
pub struct FailingDatabaseClient {
    message: String,
    executed: Mutex<Vec<String>>,
}

impl FailingDatabaseClient {
    /// Creates a client that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the statements attempted so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn fail(&self, sql: &str) -> AppError {
        if let Ok(mut guard) = self.executed.lock() {
            guard.push(sql.to_string());
        }
        AppError::query(self.message.clone())
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        Err(self.fail(sql))
    }

    async fn execute_batch(&self, sql: &str) -> Result<()> {
        Err(self.fail(sql))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
