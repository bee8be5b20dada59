//! Named query file parsing.
//!
//! A query file holds several SQL statements, each introduced by a marker
//! line:
//!
//! ```sql
//! -- QUERY: movies_avg_rating
//! SELECT title, AVG(rating) FROM ratings JOIN movies USING (movieId)
//! GROUP BY movieId;
//! ```
//!
//! A block runs until the next marker or the end of the file.

use crate::error::{AppError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

lazy_static! {
    /// Matches `-- QUERY: <name>` with optional whitespace around every token.
    static ref MARKER: Regex =
        Regex::new(r"^\s*--\s*QUERY\s*:\s*([A-Za-z0-9_\-.]+)\s*$").expect("marker pattern is valid");
}

/// Query name to SQL body, ordered by name.
pub type NamedQueries = BTreeMap<String, String>;

/// Splits `sql_text` into named blocks.
///
/// Lines before the first marker are dropped. Each body is trimmed and loses
/// at most one trailing `;`. A marker name used twice is an error.
pub fn parse_named_queries(sql_text: &str) -> Result<NamedQueries> {
    let mut blocks: Vec<(String, Vec<&str>)> = Vec::new();

    for line in sql_text.lines() {
        if let Some(name) = marker_name(line) {
            if blocks.iter().any(|(existing, _)| existing == name) {
                return Err(AppError::DuplicateQueryName {
                    name: name.to_string(),
                });
            }
            blocks.push((name.to_string(), Vec::new()));
        } else if let Some((_, chunk)) = blocks.last_mut() {
            chunk.push(line);
        }
    }

    Ok(blocks
        .into_iter()
        .map(|(name, chunk)| (name, assemble_body(&chunk)))
        .collect())
}

/// Reads and parses a query file.
pub fn load_named_queries(path: &Path) -> Result<NamedQueries> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::missing_file(path),
        _ => AppError::Io(format!("Failed to read {}: {e}", path.display())),
    })?;
    parse_named_queries(&text)
}

fn marker_name(line: &str) -> Option<&str> {
    MARKER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn assemble_body(lines: &[&str]) -> String {
    let joined = lines.join("\n");
    let sql = joined.trim();
    match sql.strip_suffix(';') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => sql.to_string(),
    }
}
