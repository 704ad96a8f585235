// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The seams other layers plug into:
//
//   TableSource       - anything that can produce a Table
//                       (CsvLoader today)
//   HiddenSizePolicy  - how wide an encoder's hidden layers are
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::table::{Table, TableShape};

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can load a table.
///
/// Implementations:
///   - CsvLoader → headered CSV file
pub trait TableSource {
    fn load(&self) -> Result<Table>;
}

// ─── HiddenSizePolicy ─────────────────────────────────────────────────────────
/// Chooses the hidden layer width of an encoder from the shape it
/// encodes. No statistics-driven rule exists yet; new policies
/// implement this trait.
pub trait HiddenSizePolicy {
    fn hidden_size(&self, shape: TableShape) -> usize;
}

/// Hidden width of rows × columns (row encoder default)
#[derive(Debug, Clone, Copy, Default)]
pub struct TableProduct;

impl HiddenSizePolicy for TableProduct {
    fn hidden_size(&self, shape: TableShape) -> usize {
        (shape.rows * shape.columns).max(1)
    }
}

/// A fixed hidden width (per-type encoder default is 10)
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub usize);

impl Default for Fixed {
    fn default() -> Self {
        Fixed(10)
    }
}

impl HiddenSizePolicy for Fixed {
    fn hidden_size(&self, _shape: TableShape) -> usize {
        self.0.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_product() {
        assert_eq!(TableProduct.hidden_size(TableShape::new(4, 3)), 12);
    }

    #[test]
    fn test_fixed_ignores_shape() {
        assert_eq!(Fixed::default().hidden_size(TableShape::new(1000, 50)), 10);
        assert_eq!(Fixed(32).hidden_size(TableShape::new(2, 2)), 32);
    }

    #[test]
    fn test_policies_never_return_zero() {
        assert_eq!(TableProduct.hidden_size(TableShape::new(0, 3)), 1);
        assert_eq!(Fixed(0).hidden_size(TableShape::new(3, 3)), 1);
    }
}
