// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: rating rows, movie metadata, and the dense
// identifier indices the model is trained against.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits

/// Rating records, movie metadata, and indexed rows
pub mod rating;

/// Bijective raw-identifier → dense-index mapping
pub mod index_map;

/// Core abstractions (traits) that other layers implement
pub mod traits;
