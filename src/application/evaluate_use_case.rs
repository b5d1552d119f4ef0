// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a ratings CSV against a saved artifact using the
// artifact's own index maps. Rows whose user or movie the model
// has never seen are counted and skipped, not guessed.

use anyhow::{Context, Result};
use burn::data::dataloader::DataLoaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    batcher::RatingBatcher,
    dataset::{RatingDataset, RatingSample},
    loader::CsvRatingSource,
};
use crate::domain::traits::RatingSource;
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{inferencer::InferBackend, trainer::sum_squared_error};

const EVAL_BATCH_SIZE: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub rows:    usize,
    pub scored:  usize,
    pub skipped: usize,
    pub mse:     f64,
    pub rmse:    f64,
}

pub struct EvaluateUseCase {
    store: ArtifactStore,
}

impl EvaluateUseCase {
    pub fn new(artifact_dir: impl AsRef<Path>) -> Self {
        Self { store: ArtifactStore::new(artifact_dir.as_ref()) }
    }

    pub fn execute(&self, ratings_path: impl AsRef<Path>) -> Result<EvaluationReport> {
        let device   = Default::default();
        let artifact = self
            .store
            .load::<InferBackend>(&device)
            .with_context(|| format!("Cannot load artifact '{}'", self.store.dir().display()))?;

        let records = CsvRatingSource::new(ratings_path.as_ref())
            .load_ratings()
            .with_context(|| format!("Cannot read '{}'", ratings_path.as_ref().display()))?;
        let rows = records.len();

        let samples: Vec<RatingSample> = records
            .iter()
            .filter_map(|r| {
                Some(RatingSample {
                    user:   artifact.users.get(&r.user_id)?,
                    item:   artifact.items.get(&r.item_id)?,
                    rating: r.rating,
                })
            })
            .collect();
        let skipped = rows - samples.len();
        if skipped > 0 {
            tracing::warn!("Skipping {} of {} rows with ids unknown to the model", skipped, rows);
        }

        let loader = DataLoaderBuilder::new(RatingBatcher::<InferBackend>::new(device))
            .batch_size(EVAL_BATCH_SIZE)
            .build(RatingDataset::new(samples));
        let (sse, scored) = sum_squared_error(&artifact.model, loader.iter());

        let mse = if scored > 0 { sse / scored as f64 } else { f64::NAN };
        Ok(EvaluationReport { rows, scored, skipped, mse, rmse: mse.sqrt() })
    }
}
