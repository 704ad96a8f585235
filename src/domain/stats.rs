// ============================================================
// Layer 3 - Column Statistics
// ============================================================
// The record kept for every banished column: its value range,
// the shape of the table it came from, and (for categorical
// columns) the labels its codes refer to. The encoder that goes
// with a column is the registry entry for its kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::column::ColumnKind;
use crate::domain::table::TableShape;

/// Observed value range of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into [0, 1]. Callers guarantee a non-zero span.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.span();
        if span.is_finite() {
            (value - self.min) / span
        } else {
            // Range wider than f64::MAX: work on halves, which cannot overflow.
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }

    /// Inverse of `scale`
    pub fn unscale(&self, scaled: f64) -> f64 {
        let span = self.span();
        if span.is_finite() {
            self.min + scaled * span
        } else {
            self.min * (1.0 - scaled) + self.max * scaled
        }
    }
}

/// Statistics record of one column. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name:   String,
    pub kind:   ColumnKind,
    pub bounds: Bounds,
    pub shape:  TableShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl ColumnStats {
    /// Turn a scaled value back into a cell of this column's kind.
    pub fn decode(&self, scaled: f64) -> CellValue {
        match self.kind {
            ColumnKind::Numeric => CellValue::Number(self.bounds.unscale(scaled)),
            ColumnKind::Boolean => CellValue::Flag(scaled >= 0.5),
            ColumnKind::Categorical => {
                let code = self.bounds.unscale(scaled).round();
                let last = self.categories.len().saturating_sub(1);
                let idx  = if code <= 0.0 { 0 } else { (code as usize).min(last) };
                CellValue::Label(self.categories.get(idx).cloned().unwrap_or_default())
            }
            ColumnKind::FreeText => CellValue::Missing,
        }
    }
}

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Flag(bool),
    Label(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v:.4}"),
            CellValue::Flag(b)   => write!(f, "{b}"),
            CellValue::Label(s)  => f.write_str(s),
            CellValue::Missing   => f.write_str("-"),
        }
    }
}
