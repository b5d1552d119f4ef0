// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the other layers:
//
//   checkpoint.rs — the trained artifact: model weights via
//                   Burn's CompactRecorder, architecture config
//                   and the index maps, saved atomically
//
//   metrics.rs    — per-epoch training metrics appended to a CSV
//
//   catalog.rs    — movie title → movieId lookup used by serving

/// Trained artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Title lookup over the movie catalog
pub mod catalog;
