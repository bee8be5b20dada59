//! Plain-text rendering of query results.
//!
//! Produces an aligned table capped at a fixed number of rows:
//!
//! ```text
//! Total rows: 7
//! movieId | title
//! --------+-----------------
//!       1 | Toy Story (1995)
//! (5 of 7 rows shown)
//! ```

use crate::db::{QueryResult, Value};

/// Rows shown when the caller does not pick a cap.
pub const DEFAULT_MAX_ROWS: usize = 5;

/// Printed instead of a table for statements without result columns.
pub const NO_RESULT_SET: &str = "(No result set)";

const CELL_SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";

/// Renders a query result as a text table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    max_rows: usize,
}

impl<'a> ResultTable<'a> {
    /// Creates a table showing at most [`DEFAULT_MAX_ROWS`] rows.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Sets the display cap. Zero shows the header only.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    fn displayed_rows(&self) -> &'a [Vec<Value>] {
        let shown = self.result.rows.len().min(self.max_rows);
        &self.result.rows[..shown]
    }

    /// Width per column: the longest of the column name and every displayed
    /// cell. Rows past the cap never widen a column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| col.name.chars().count())
            .collect();

        for row in self.displayed_rows() {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.to_display_string().chars().count());
            }
        }

        widths
    }

    /// Renders the table, preceded by `description` when given.
    pub fn render_to_lines(&self, description: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(description) = description {
            lines.push(description.to_string());
        }

        if self.result.columns.is_empty() {
            lines.push(NO_RESULT_SET.to_string());
            return lines;
        }

        let total = self.result.rows.len();
        lines.push(format!("Total rows: {total}"));

        let widths = self.calculate_column_widths();
        lines.push(self.render_header_row(&widths));
        lines.push(render_rule(&widths));

        for row in self.displayed_rows() {
            lines.push(render_data_row(row, &widths));
        }

        lines.push(self.render_footer());
        lines
    }

    fn render_header_row(&self, widths: &[usize]) -> String {
        self.result
            .columns
            .iter()
            .zip(widths)
            .map(|(col, &width)| pad_left_aligned(&col.name, width))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
    }

    fn render_footer(&self) -> String {
        let total = self.result.rows.len();
        if total > self.max_rows {
            format!("({} of {} rows shown)", self.max_rows, total)
        } else {
            format!("({total} rows)")
        }
    }
}

fn render_rule(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|&width| "-".repeat(width))
        .collect::<Vec<_>>()
        .join(RULE_SEPARATOR)
}

fn render_data_row(row: &[Value], widths: &[usize]) -> String {
    row.iter()
        .zip(widths)
        .map(|(value, &width)| {
            let display = value.to_display_string();
            if value.is_text() {
                pad_left_aligned(&display, width)
            } else {
                pad_right_aligned(&display, width)
            }
        })
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

// `format!("{:<w$}")` pads by char count, matching how widths are measured.
fn pad_left_aligned(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

fn pad_right_aligned(s: &str, width: usize) -> String {
    format!("{s:>width$}")
}
