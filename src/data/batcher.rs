// ============================================================
// Layer 4 - Row Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<RowSample> into
// the two input tensors the encoders consume:
//
//   rows      [batch, 1] Int    → row encoder (embedding lookup)
//   positions [batch, 1] Float  → per-type encoders (scalar input)
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::RowSample;

/// A batch of rows ready for a forward pass.
#[derive(Debug, Clone)]
pub struct RowBatch<B: Backend> {
    /// Row identifiers, shape [batch, 1]
    pub rows: Tensor<B, 2, Int>,

    /// Normalized row positions, shape [batch, 1]
    pub positions: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct RowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> RowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<RowSample, RowBatch<B>> for RowBatcher<B> {
    fn batch(&self, items: Vec<RowSample>) -> RowBatch<B> {
        let batch_size = items.len();

        let rows: Vec<i64> = items.iter().map(|s| s.row as i64).collect();
        let positions: Vec<f32> = items.iter().map(|s| s.position).collect();

        let rows = Tensor::<B, 2, Int>::from_data(
            TensorData::new(rows, [batch_size, 1]), &self.device,
        );
        let positions = Tensor::<B, 2>::from_data(
            TensorData::new(positions, [batch_size, 1]), &self.device,
        );

        RowBatch { rows, positions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let batcher = RowBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![
            RowSample { row: 0, position: 0.0 },
            RowSample { row: 4, position: 1.0 },
        ]);

        assert_eq!(batch.rows.dims(), [2, 1]);
        assert_eq!(batch.positions.dims(), [2, 1]);

        let rows = batch.rows.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(rows, vec![0, 4]);
    }
}
