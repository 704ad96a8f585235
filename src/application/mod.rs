// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers. No tensor math, no printing,
// no direct file access: only workflow coordination.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Load, scale, encode and persist a table
pub mod banish_use_case;

// Reload encoders and summon rows
pub mod summon_use_case;
