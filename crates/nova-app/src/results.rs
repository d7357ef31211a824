// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const DEFAULT_COLUMN_WIDTH: usize = 20;

const NULL_TEXT: &str = "NULL";
const COLUMN_GAP: &str = "  ";

/// Column names and rows exactly as the store returned them. `None` is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fixed-width text: header, a dash rule as long as the header, then rows.
    pub fn render(&self, width: usize) -> String {
        let header = format_line(self.columns.iter().map(String::as_str), width);
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push("-".repeat(header.chars().count()));
        for row in &self.rows {
            lines.push(format_line(
                row.iter().map(|cell| cell.as_deref().unwrap_or(NULL_TEXT)),
                width,
            ));
        }
        lines.insert(0, header);
        lines.join("\n")
    }
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, width: usize) -> String {
    cells
        .map(|cell| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

/// The single buffered result behind "Show Results". Disabled while empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultViewer {
    #[default]
    Empty,
    Populated(ResultSet),
}

impl ResultViewer {
    /// Replaces whatever was buffered. A set with no rows disables the viewer.
    pub fn receive(&mut self, result_set: ResultSet) {
        *self = if result_set.is_empty() {
            Self::Empty
        } else {
            Self::Populated(result_set)
        };
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Populated(_))
    }

    pub fn current(&self) -> Option<&ResultSet> {
        match self {
            Self::Empty => None,
            Self::Populated(result_set) => Some(result_set),
        }
    }

    pub fn render(&self, width: usize) -> Option<String> {
        self.current().map(|result_set| result_set.render(width))
    }
}
