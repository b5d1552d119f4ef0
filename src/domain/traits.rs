// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application and API layers program against these,
// so a different table source or predictor can be dropped in
// without touching the code that uses them.

use crate::domain::rating::{MovieMetadata, RatingRecord};
use crate::error::{DataError, PredictionError};

// ─── RatingSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the full ratings table.
///
/// Implementations:
///   - CsvRatingSource → reads a `userId,movieId,rating[,timestamp]` file
pub trait RatingSource {
    fn load_ratings(&self) -> Result<Vec<RatingRecord>, DataError>;
}

// ─── MetadataSource ───────────────────────────────────────────────────────────
/// Anything that can produce movie metadata rows.
pub trait MetadataSource {
    fn load_metadata(&self) -> Result<Vec<MovieMetadata>, DataError>;
}

// ─── RatingPredictor ──────────────────────────────────────────────────────────
/// Predicts a rating for a (raw user id, raw item id) pair.
///
/// Implementations must treat identifiers missing from their
/// index maps as errors, never fall back to a default row.
pub trait RatingPredictor: Send + Sync {
    fn predict(&self, user_id: &str, item_id: &str) -> Result<f32, PredictionError>;
}
