use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::table::TableShape;

/// One row to encode: its identifier and its normalized position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowSample {
    pub row:      usize,
    pub position: f32,
}

/// Every row of a table, in order.
pub struct RowDataset {
    shape: TableShape,
}

impl RowDataset {
    pub fn new(shape: TableShape) -> Self { Self { shape } }
}

impl Dataset<RowSample> for RowDataset {
    fn get(&self, index: usize) -> Option<RowSample> {
        self.shape.contains_row(index).then(|| RowSample {
            row:      index,
            position: self.shape.position(index),
        })
    }

    fn len(&self) -> usize {
        self.shape.rows
    }
}
