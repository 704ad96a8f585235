// ============================================================
// Layer 4 - Min-Max Scaler
// ============================================================
// Rescales a column into [0, 1]:
//
//   scaled = (value - min) / (max - min)
//
// Scaling policy per column kind:
//   Numeric      → min-max over the values
//   Boolean      → false = 0.0, true = 1.0, bounds fixed at [0, 1]
//   Categorical  → min-max over the category codes
//   FreeText     → unsupported
//
// A constant column has max == min and cannot be min-max scaled;
// it is reported as ScaleError::Constant instead of dividing by 0.
//
// Reference: Rust Book §9 (Error Handling)

use thiserror::Error;

use crate::domain::column::{Column, ColumnKind, ColumnValues};
use crate::domain::stats::{Bounds, ColumnStats};
use crate::domain::table::TableShape;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("cannot scale an empty column")]
    Empty,

    #[error("non-finite value at row {index}")]
    NonFinite { index: usize },

    #[error("constant column (every value is {value}); min-max scaling is undefined")]
    Constant { value: f64 },

    #[error("{0} columns have no scaling policy")]
    Unsupported(ColumnKind),
}

/// A column mapped into [0, 1] together with its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledColumn {
    pub stats:  ColumnStats,
    pub values: Vec<f64>,
}

/// Min-max scale `values` into [0, 1], returning the observed bounds.
pub fn min_max_scale(values: &[f64]) -> Result<(Bounds, Vec<f64>), ScaleError> {
    if values.is_empty() {
        return Err(ScaleError::Empty);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ScaleError::NonFinite { index });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return Err(ScaleError::Constant { value: min });
    }

    let bounds = Bounds::new(min, max);
    let scaled = values.iter().map(|&v| bounds.scale(v)).collect();
    Ok((bounds, scaled))
}

/// Apply the scaling policy of the column's kind.
pub fn scale_column(column: &Column, shape: TableShape) -> Result<ScaledColumn, ScaleError> {
    let (bounds, values, categories) = match &column.values {
        ColumnValues::Numeric(values) => {
            let (bounds, scaled) = min_max_scale(values)?;
            (bounds, scaled, Vec::new())
        }
        ColumnValues::Boolean(flags) => {
            if flags.is_empty() {
                return Err(ScaleError::Empty);
            }
            let scaled = flags.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
            (Bounds::new(0.0, 1.0), scaled, Vec::new())
        }
        ColumnValues::Categorical { codes, categories } => {
            let codes: Vec<f64> = codes.iter().map(|&c| c as f64).collect();
            let (bounds, scaled) = min_max_scale(&codes)?;
            (bounds, scaled, categories.clone())
        }
        ColumnValues::FreeText(_) => return Err(ScaleError::Unsupported(ColumnKind::FreeText)),
    };

    tracing::debug!(
        "Scaled '{}' ({}): min={} max={}",
        column.name, column.kind(), bounds.min, bounds.max
    );

    Ok(ScaledColumn {
        stats: ColumnStats {
            name: column.name.clone(),
            kind: column.kind(),
            bounds,
            shape,
            categories,
        },
        values,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_one_five_ten() {
        let (bounds, scaled) = min_max_scale(&[1.0, 5.0, 10.0]).unwrap();
        assert_eq!(bounds, Bounds::new(1.0, 10.0));
        assert!(approx(scaled[0], 0.0));
        assert!(approx(scaled[1], 0.444));
        assert!(approx(scaled[2], 1.0));
    }

    #[test]
    fn test_scaled_values_stay_in_unit_interval() {
        let values = [3.5, -2.0, 17.25, 0.0, 9.0, -2.0, 4.4];
        let (_, scaled) = min_max_scale(&values).unwrap();
        assert!(scaled.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // min maps to exactly 0, max to exactly 1
        assert_eq!(scaled[1], 0.0);
        assert_eq!(scaled[2], 1.0);
    }

    #[test]
    fn test_range_wider_than_f64_max() {
        let (bounds, scaled) = min_max_scale(&[-1.0e308, 0.0, 1.0e308]).unwrap();
        assert!(bounds.span().is_infinite());
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
        assert_eq!(bounds.unscale(1.0), 1.0e308);
        assert_eq!(bounds.unscale(0.0), -1.0e308);
    }

    #[test]
    fn test_constant_column_is_an_error() {
        assert_eq!(
            min_max_scale(&[4.0, 4.0, 4.0]),
            Err(ScaleError::Constant { value: 4.0 })
        );
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert_eq!(min_max_scale(&[]), Err(ScaleError::Empty));
        assert_eq!(
            min_max_scale(&[1.0, f64::NAN, 2.0]),
            Err(ScaleError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_boolean_policy_tolerates_constant_columns() {
        let col    = Column::new("flag", ColumnValues::Boolean(vec![true, true]));
        let scaled = scale_column(&col, TableShape::new(2, 1)).unwrap();
        assert_eq!(scaled.values, vec![1.0, 1.0]);
        assert_eq!(scaled.stats.bounds, Bounds::new(0.0, 1.0));
    }

    #[test]
    fn test_categorical_policy_scales_codes() {
        let col    = Column::new("colour", ColumnValues::categorical(&["b", "a", "c", "a"]));
        let scaled = scale_column(&col, TableShape::new(4, 1)).unwrap();
        assert_eq!(scaled.values, vec![0.5, 0.0, 1.0, 0.0]);
        assert_eq!(scaled.stats.categories, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_category_is_constant() {
        let col = Column::new("only", ColumnValues::categorical(&["x", "x"]));
        assert!(matches!(
            scale_column(&col, TableShape::new(2, 1)),
            Err(ScaleError::Constant { .. })
        ));
    }

    #[test]
    fn test_free_text_is_unsupported() {
        let col = Column::new("notes", ColumnValues::FreeText(vec!["hi".into()]));
        assert_eq!(
            scale_column(&col, TableShape::new(1, 0)),
            Err(ScaleError::Unsupported(ColumnKind::FreeText))
        );
    }
}
