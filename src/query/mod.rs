//! Named query loading, execution, and result formatting.
//!
//! This module parses query files into named SQL blocks, runs one block by
//! name against a [`crate::db::DatabaseClient`], and renders the result as a
//! plain-text table.

pub mod format;
pub mod parser;
pub mod runner;

pub use format::{ResultTable, DEFAULT_MAX_ROWS};
pub use parser::{load_named_queries, parse_named_queries, NamedQueries};
pub use runner::NamedQuery;
