// ============================================================
// Layer 3 — Rating Domain Types
// ============================================================
// A ratings table row as read from disk, the optional movie
// metadata it can be joined with, and the indexed row the
// training pipeline actually consumes.
//
// Raw identifiers are kept as strings: ratings files use
// integers, serving clients send strings, and the index map
// only needs equality.

use serde::{Deserialize, Serialize};

/// One row of the ratings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(rename = "movieId")]
    pub item_id: String,

    pub rating: f32,

    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RatingRecord {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>, rating: f32) -> Self {
        Self {
            user_id:   user_id.into(),
            item_id:   item_id.into(),
            rating,
            timestamp: None,
        }
    }
}

/// One row of the movie catalog / metadata table.
///
/// `genres` is pipe-separated ("Action|Comedy"); `release_date`
/// is free text and only parsed when features are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    #[serde(rename = "movieId")]
    pub movie_id: String,

    pub title: String,

    #[serde(default)]
    pub genres: Option<String>,

    #[serde(default)]
    pub release_date: Option<String>,
}

/// Features derived from a metadata join.
/// Either derived field may be empty on its own: a bad date
/// only drops `release_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFeatures {
    pub title:        String,
    pub genres:       Option<String>,
    pub release_year: Option<i32>,
    pub genre_count:  Option<usize>,
}

/// A rating row augmented with its dense user/item indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRating {
    pub record:   RatingRecord,
    pub user:     usize,
    pub item:     usize,
    pub features: Option<ItemFeatures>,
}
