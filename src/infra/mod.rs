// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File persistence for banish runs:
//
//   checkpoint.rs - manifest JSON, encoder records
//                   and CSV outputs
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Manifest, encoder record and CSV persistence
pub mod checkpoint;
