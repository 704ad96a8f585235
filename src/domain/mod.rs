// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing tables,
// columns and their statistics.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Column kinds and typed cell values
pub mod column;

// Tables and their shape
pub mod table;

// Per-column value ranges and decoding
pub mod stats;

// Core abstractions (traits) that other layers implement
pub mod traits;
