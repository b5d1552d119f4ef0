// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Takes the ratings CSV all the way to tensor batches:
//
//   ratings.csv (+ movies.csv)
//       │
//       ▼
//   CsvRatingSource   → reads rating rows
//       │
//       ▼
//   index + join      → dense user/item indices, metadata features
//       │
//       ▼
//   splitter          → seeded train/test partition
//       │
//       ▼
//   RatingDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   RatingBatcher     → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads ratings and metadata CSV files, builds indexed partitions
pub mod loader;

/// Metadata join and derived item features
pub mod metadata;

/// Seeded train/test splitting
pub mod splitter;

/// Implements Burn's Dataset trait for rating samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
