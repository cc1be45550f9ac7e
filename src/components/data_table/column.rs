//! Column Definition
//!
//! Table columns with their header label and cell renderer.

use crate::utils::format::{display_width, truncate};

/// Cell renderer
pub type CellRenderer<R> = Box<dyn Fn(&R) -> String + Send + Sync>;

/// Column width specification, in terminal columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Fixed width; longer cells are truncated
    Fixed(usize),
    /// Sized to content, clamped to `max`
    Flex { max: Option<usize> },
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex { max: None }
    }
}

/// Horizontal alignment of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Column definition for the DataTable
pub struct Column<R> {
    /// Column header label
    pub label: String,
    pub width: ColumnWidth,
    pub align: Align,
    render: CellRenderer<R>,
}

impl<R> Column<R> {
    pub fn new(label: impl Into<String>, render: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            width: ColumnWidth::default(),
            align: Align::default(),
            render: Box::new(render),
        }
    }

    pub fn fixed_width(mut self, width: usize) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    pub fn max_width(mut self, max: usize) -> Self {
        self.width = ColumnWidth::Flex { max: Some(max) };
        self
    }

    pub fn align_right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    /// Render a cell, truncated to the column's limit
    pub fn render_cell(&self, row: &R) -> String {
        let text = (self.render)(row);
        match self.width {
            ColumnWidth::Fixed(limit) | ColumnWidth::Flex { max: Some(limit) } => truncate(&text, limit),
            ColumnWidth::Flex { max: None } => text,
        }
    }

    /// Final width given the rendered cells
    pub fn resolve_width(&self, cells: &[String]) -> usize {
        let content = cells
            .iter()
            .map(|c| display_width(c))
            .chain(std::iter::once(display_width(&self.label)))
            .max()
            .unwrap_or(0);
        match self.width {
            ColumnWidth::Fixed(width) => width.max(display_width(&self.label)),
            ColumnWidth::Flex { .. } => content,
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("align", &self.align)
            .finish()
    }
}
