use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::rating::IndexedRating;

/// One training example: dense indices and the target rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSample {
    pub user:   usize,
    pub item:   usize,
    pub rating: f32,
}

impl From<&IndexedRating> for RatingSample {
    fn from(row: &IndexedRating) -> Self {
        Self { user: row.user, item: row.item, rating: row.record.rating }
    }
}

pub struct RatingDataset {
    samples: Vec<RatingSample>,
}

impl RatingDataset {
    pub fn new(samples: Vec<RatingSample>) -> Self { Self { samples } }

    pub fn from_rows(rows: &[IndexedRating]) -> Self {
        Self::new(rows.iter().map(RatingSample::from).collect())
    }
}

impl Dataset<RatingSample> for RatingDataset {
    fn get(&self, index: usize) -> Option<RatingSample> {
        self.samples.get(index).copied()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
