use std::sync::Arc;

use crate::api::metrics::ServingMetrics;
use crate::application::predict_use_case::PredictUseCase;

/// Read-only state shared by every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub predictions: Arc<PredictUseCase>,
    pub metrics:     Arc<ServingMetrics>,
}

impl AppContext {
    pub fn new(predictions: PredictUseCase) -> Self {
        Self {
            predictions: Arc::new(predictions),
            metrics:     Arc::new(ServingMetrics::new()),
        }
    }
}
