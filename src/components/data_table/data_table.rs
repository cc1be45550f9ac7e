//! DataTable Component
//!
//! Renders rows as an aligned plain-text table.

use super::column::{Align, Column};
use super::pagination::{PageButton, Pager};
use crate::utils::format::display_width;

/// Text table over rows of `R`
pub struct DataTable<R> {
    columns: Vec<Column<R>>,
    empty_message: String,
}

impl<R> DataTable<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            empty_message: "No data".to_string(),
        }
    }

    /// Set the empty message
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Render `rows`; the empty message replaces the table when there are none
    pub fn render(&self, rows: &[R]) -> String {
        if rows.is_empty() {
            return self.empty_message.clone();
        }

        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| rows.iter().map(|row| col.render_cell(row)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(col, cells)| col.resolve_width(cells))
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| pad(&col.label, *width, col.align))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));

        for row_index in 0..rows.len() {
            let line: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| pad(&cells[i][row_index], widths[i], col.align))
                .collect();
            out.push('\n');
            out.push_str(line.join("  ").trim_end());
        }
        out
    }
}

/// Page selector line, e.g. "« Prev 1 … 8 9 [10] 11 12 … 20 Next »"; empty for a single page
pub fn render_page_selector(pager: &Pager, prev: &str, next: &str) -> String {
    pager
        .buttons()
        .iter()
        .map(|button| match button {
            PageButton::Prev { enabled: true } => format!("« {prev}"),
            PageButton::Prev { enabled: false } => format!("({prev})"),
            PageButton::Page { number, active: true } => format!("[{number}]"),
            PageButton::Page { number, active: false } => number.to_string(),
            PageButton::Ellipsis => "…".to_string(),
            PageButton::Next { enabled: true } => format!("{next} »"),
            PageButton::Next { enabled: false } => format!("({next})"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}
