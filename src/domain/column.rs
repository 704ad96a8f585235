// ============================================================
// Layer 3 - Column Domain Types
// ============================================================
// A column is a name plus typed cells. The cell type is an
// explicit tagged variant, one per supported data kind:
//
//   Numeric      → f64 values
//   Boolean      → true/false
//   Categorical  → codes into a sorted category list
//   FreeText     → raw strings (classified, never encoded)
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

/// The data kind of a column. Each kind owns at most one encoder
/// in the registry and carries its own scaling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
    FreeText,
}

impl ColumnKind {
    /// Every kind, in registry order
    pub const ALL: [ColumnKind; 4] = [
        ColumnKind::Numeric,
        ColumnKind::Boolean,
        ColumnKind::Categorical,
        ColumnKind::FreeText,
    ];

    /// Free text needs a vocabulary; everything else converts to numbers.
    pub fn is_encodable(self) -> bool {
        !matches!(self, ColumnKind::FreeText)
    }

    /// Stable lowercase name used in file names and the manifest
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric     => "numeric",
            ColumnKind::Boolean     => "boolean",
            ColumnKind::Categorical => "categorical",
            ColumnKind::FreeText    => "free_text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed cells of one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<f64>),
    Boolean(Vec<bool>),
    Categorical {
        /// Index into `categories` for every row
        codes:      Vec<usize>,
        /// Distinct labels, sorted
        categories: Vec<String>,
    },
    FreeText(Vec<String>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numeric(_)          => ColumnKind::Numeric,
            ColumnValues::Boolean(_)          => ColumnKind::Boolean,
            ColumnValues::Categorical { .. }  => ColumnKind::Categorical,
            ColumnValues::FreeText(_)         => ColumnKind::FreeText,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v)                => v.len(),
            ColumnValues::Boolean(v)                => v.len(),
            ColumnValues::Categorical { codes, .. } => codes.len(),
            ColumnValues::FreeText(v)               => v.len(),
        }
    }

    /// Build categorical values from raw cells.
    /// Categories are sorted so the coding does not depend on row order.
    pub fn categorical<S: AsRef<str>>(cells: &[S]) -> Self {
        let labels: BTreeSet<&str> = cells.iter().map(|c| c.as_ref()).collect();
        let index: BTreeMap<&str, usize> =
            labels.iter().enumerate().map(|(code, &label)| (label, code)).collect();

        let codes = cells.iter().map(|c| index[c.as_ref()]).collect();
        let categories = labels.into_iter().map(str::to_string).collect();

        ColumnValues::Categorical { codes, categories }
    }
}

/// One named column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name:   String,
    pub values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self { name: name.into(), values }
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
