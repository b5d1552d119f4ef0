// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Wraps a trained model and the index maps it was trained
// with. Raw identifiers go in, a rating comes out; anything
// not in the index maps is an error.

use burn::prelude::*;
use std::sync::Mutex;

use crate::domain::{index_map::IdIndex, traits::RatingPredictor};
use crate::error::{ArtifactError, PredictionError};
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::model::RecommenderNet;

pub type InferBackend = burn::backend::NdArray;

pub struct Predictor {
    // Burn modules are Send but not Sync; the mutex makes the
    // predictor shareable across request handlers.
    model:  Mutex<RecommenderNet<InferBackend>>,
    users:  IdIndex,
    items:  IdIndex,
    device: burn::backend::ndarray::NdArrayDevice,
}

impl Predictor {
    pub fn new(model: RecommenderNet<InferBackend>, users: IdIndex, items: IdIndex) -> Self {
        Self {
            model:  Mutex::new(model),
            users,
            items,
            device: Default::default(),
        }
    }

    /// Rebuild the model from a saved artifact directory.
    pub fn from_artifact(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        let device   = burn::backend::ndarray::NdArrayDevice::default();
        let artifact = store.load::<InferBackend>(&device)?;
        tracing::info!(
            "Model loaded from '{}' ({} users, {} movies)",
            store.dir().display(),
            artifact.users.len(),
            artifact.items.len()
        );
        Ok(Self::new(artifact.model, artifact.users, artifact.items))
    }

    /// Forward pass for one already-resolved (user, item) pair.
    pub fn predict_indices(&self, user: usize, item: usize) -> Result<f32, PredictionError> {
        let model = self
            .model
            .lock()
            .map_err(|_| PredictionError::Internal("model lock poisoned".to_string()))?;

        let users = Tensor::<InferBackend, 1, Int>::from_ints([user as i32], &self.device);
        let items = Tensor::<InferBackend, 1, Int>::from_ints([item as i32], &self.device);

        let rating: f32 = model.forward(users, items).into_scalar().elem();
        if !rating.is_finite() {
            return Err(PredictionError::NonFinite);
        }
        Ok(rating)
    }
}

impl RatingPredictor for Predictor {
    fn predict(&self, user_id: &str, item_id: &str) -> Result<f32, PredictionError> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| PredictionError::UnknownUser(user_id.to_string()))?;
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| PredictionError::UnknownItem(item_id.to_string()))?;

        let rating = self.predict_indices(user, item)?;
        tracing::debug!("Predicted {:.3} for user={} movie={}", rating, user_id, item_id);
        Ok(rating)
    }
}
