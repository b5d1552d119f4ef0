// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Resolves a (user id, movie title) request to a rating:
//
//   movie title ──catalog──▶ movieId ──item index──▶ item row
//   user id     ──────────────────────user index──▶ user row
//
// A title that is not in the catalog is tried as a raw movieId
// before giving up. Both the HTTP handler and the `predict`
// CLI command go through here.

use anyhow::{Context, Result};
use std::{path::Path, sync::Arc};

use crate::domain::traits::RatingPredictor;
use crate::error::PredictionError;
use crate::infra::{catalog::Catalog, checkpoint::ArtifactStore};
use crate::ml::inferencer::Predictor;

pub struct PredictUseCase {
    predictor: Arc<dyn RatingPredictor>,
    catalog:   Catalog,
}

impl PredictUseCase {
    pub fn new(predictor: Arc<dyn RatingPredictor>, catalog: Catalog) -> Self {
        Self { predictor, catalog }
    }

    /// Load the trained artifact and the catalog from disk.
    pub fn from_files(artifact_dir: impl AsRef<Path>, catalog_path: impl AsRef<Path>) -> Result<Self> {
        let store = ArtifactStore::new(artifact_dir.as_ref());
        let predictor = Predictor::from_artifact(&store).with_context(|| {
            format!(
                "Cannot load model from '{}'. Have you run 'train' first?",
                artifact_dir.as_ref().display()
            )
        })?;
        let catalog = Catalog::from_csv(catalog_path.as_ref())
            .with_context(|| format!("Cannot load catalog '{}'", catalog_path.as_ref().display()))?;
        Ok(Self::new(Arc::new(predictor), catalog))
    }

    /// The movieId a title refers to.
    pub fn resolve_movie<'a>(&'a self, movie_title: &'a str) -> &'a str {
        self.catalog.movie_id(movie_title).unwrap_or(movie_title)
    }

    pub fn predict(&self, user_id: &str, movie_title: &str) -> Result<f32, PredictionError> {
        let movie_id = self.resolve_movie(movie_title);
        match self.predictor.predict(user_id, movie_id) {
            // Report what the caller asked for, not the internal movieId
            Err(PredictionError::UnknownItem(_)) => {
                Err(PredictionError::UnknownItem(movie_title.to_string()))
            }
            other => other,
        }
    }
}
