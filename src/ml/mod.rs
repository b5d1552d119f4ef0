// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   model.rs      — two embedding tables → concat → dense stack
//                   (ReLU + dropout) → linear scalar head
//
//   trainer.rs    — Adam/MSE training loop with RMSE reporting
//                   and early stopping that restores the best
//                   epoch's weights
//
//   inferencer.rs — loads the artifact and predicts single pairs
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Embedding recommender architecture
pub mod model;

/// Training loop with evaluation and early stopping
pub mod trainer;

/// Loads the artifact and predicts ratings
pub mod inferencer;
