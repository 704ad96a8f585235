// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// From a CSV file to tensor batches:
//
//   CSV file
//       │
//       ▼
//   CsvLoader     → reads cells, infers each column's kind
//       │
//       ▼
//   Scaler        → maps every encodable column into [0, 1]
//       │
//       ▼
//   RowDataset    → implements Burn's Dataset trait over row ids
//       │
//       ▼
//   RowBatcher    → stacks rows into [batch, 1] tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads CSV tables and infers column kinds
pub mod loader;

/// Min-max scaling and per-kind scaling policies
pub mod scaler;

/// Implements Burn's Dataset trait over table rows
pub mod dataset;

/// Implements Burn's Batcher trait to create row batches
pub mod batcher;
