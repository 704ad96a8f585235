// ============================================================
// Layer 5 - Encoding Runner
// ============================================================
// Runs the registry's encoders over rows. Backends without
// autodiff put batch normalization in inference mode, so the
// outputs depend only on the row and the encoder parameters.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use burn::{
    data::dataloader::{batcher::Batcher, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    batcher::{RowBatch, RowBatcher},
    dataset::{RowDataset, RowSample},
};
use crate::domain::column::ColumnKind;
use crate::domain::table::TableShape;
use crate::ml::registry::EncoderRegistry;

/// Encoder outputs, one inner Vec per row, rows in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encodings {
    pub rows:  Vec<Vec<f32>>,
    pub kinds: BTreeMap<ColumnKind, Vec<Vec<f32>>>,
}

/// Encode every row of a table of `shape`.
pub fn encode_table<B: Backend>(
    registry:   &EncoderRegistry<B>,
    shape:      TableShape,
    batch_size: usize,
    device:     &B::Device,
) -> Result<Encodings> {
    let loader = DataLoaderBuilder::new(RowBatcher::<B>::new(device.clone()))
        .batch_size(batch_size.max(1))
        .build(RowDataset::new(shape));

    let mut out = Encodings::default();
    for batch in loader.iter() {
        let encoded = encode_batch(registry, batch)?;
        out.rows.extend(encoded.rows);
        for (kind, values) in encoded.kinds {
            out.kinds.entry(kind).or_default().extend(values);
        }
    }

    tracing::info!("Encoded {} rows", out.rows.len());
    Ok(out)
}

/// Encode a single row. Rows outside the table are an error.
pub fn encode_row<B: Backend>(
    registry: &EncoderRegistry<B>,
    shape:    TableShape,
    row:      usize,
    device:   &B::Device,
) -> Result<Encodings> {
    if !shape.contains_row(row) {
        bail!("Row {} is outside the banished table (rows 0..{})", row, shape.rows);
    }
    let sample = RowSample { row, position: shape.position(row) };
    let batch  = RowBatcher::<B>::new(device.clone()).batch(vec![sample]);
    encode_batch(registry, batch)
}

fn encode_batch<B: Backend>(registry: &EncoderRegistry<B>, batch: RowBatch<B>) -> Result<Encodings> {
    let rows = split_rows(registry.row().forward(batch.rows))?;

    let mut kinds = BTreeMap::new();
    for (kind, entry) in registry.kinds() {
        let out = entry.model.forward(batch.positions.clone());
        kinds.insert(kind, split_rows(out)?);
    }

    Ok(Encodings { rows, kinds })
}

/// [batch, width] tensor → one Vec<f32> per row
fn split_rows<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<Vec<f32>>> {
    let [_, width] = tensor.dims();
    let flat = tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read encoder output: {e:?}"))?;
    Ok(flat.chunks(width.max(1)).map(<[f32]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::domain::column::{Column, ColumnValues};
    use crate::domain::table::Table;
    use crate::domain::traits::{Fixed, TableProduct};
    use crate::ml::registry::EncoderPlan;

    type TestBackend = NdArray;

    fn registry(shape: TableShape) -> EncoderRegistry<TestBackend> {
        let column = |name: &str| {
            Column::new(name, ColumnValues::Numeric((0..shape.rows).map(|r| r as f64).collect()))
        };
        let table = Table::new("mem", vec![column("x"), column("y")]);
        let plan  = EncoderPlan::new(&table, &TableProduct, &Fixed::default());
        EncoderRegistry::init(&plan, &Default::default()).unwrap()
    }

    #[test]
    fn test_encode_table_covers_every_row() {
        let shape    = TableShape::new(5, 2);
        let registry = registry(shape);
        let out      = encode_table(&registry, shape, 2, &Default::default()).unwrap();

        assert_eq!(out.rows.len(), 5);
        assert!(out.rows.iter().all(|r| r.len() == 2));
        assert_eq!(out.kinds[&ColumnKind::Numeric].len(), 5);
    }

    #[test]
    fn test_encode_row_matches_table_pass() {
        let shape    = TableShape::new(4, 2);
        let registry = registry(shape);
        let device   = Default::default();

        let table = encode_table(&registry, shape, 3, &device).unwrap();
        let row   = encode_row(&registry, shape, 2, &device).unwrap();

        for (a, b) in row.rows[0].iter().zip(&table.rows[2]) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_encode_row_out_of_range() {
        let shape    = TableShape::new(3, 2);
        let registry = registry(shape);
        assert!(encode_row(&registry, shape, 3, &Default::default()).is_err());
    }
}
