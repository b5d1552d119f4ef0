// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
// No ML math and no I/O formats here, only workflow.

// The training workflow: config → data → model → artifact
pub mod train_use_case;

// Single-pair prediction: title resolution + model lookup
pub mod predict_use_case;

// Scoring a ratings file against a saved artifact
pub mod evaluate_use_case;
