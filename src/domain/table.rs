// ============================================================
// Layer 3 - Table Domain Types
// ============================================================
// A table is an ordered list of equally long columns.
// TableShape is the (rows, columns) pair every encoder is sized
// from; it always describes the encodable part of the table.

use serde::{Deserialize, Serialize};

use crate::domain::column::{Column, ColumnKind};

/// Row and column counts of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub rows:    usize,
    pub columns: usize,
}

impl TableShape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Normalized position of a row in [0, 1].
    /// A single-row table maps its only row to 0.0.
    pub fn position(&self, row: usize) -> f32 {
        if self.rows <= 1 {
            0.0
        } else {
            row as f32 / (self.rows - 1) as f32
        }
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row < self.rows
    }
}

/// A loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Where the table came from (file path or a label)
    pub source:  String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(source: impl Into<String>, columns: Vec<Column>) -> Self {
        Self { source: source.into(), columns }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Columns that can be converted to numbers, in table order
    pub fn encodable(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind().is_encodable())
    }

    /// Shape of the encodable part of the table
    pub fn shape(&self) -> TableShape {
        TableShape::new(self.rows(), self.encodable().count())
    }

    pub fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }
}
