// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn module code lives here:
//
//   model.rs      - row encoder and per-type numeric encoder
//   registry.rs   - one owner for every encoder of a table,
//                   keyed by column kind
//   inferencer.rs - runs the encoders over rows
//
// Reference: Burn Book §3 (Building Blocks)

/// Encoder architectures
pub mod model;

/// Encoder registry and column banishing
pub mod registry;

/// Batched and single-row encoding
pub mod inferencer;
