// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + evaluation loop using Burn's DataLoader and Adam.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>)
//   - model.valid() gives the same weights on InnerBackend,
//     dropout disabled, for the evaluation pass
//   - Loss is MSE; RMSE is reported alongside it
//   - Early stopping watches eval MSE and keeps the weights
//     of the best epoch, which are what gets returned
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::data::{batcher::RatingBatcher, dataset::RatingDataset, loader::LoadedRatings};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{RecommenderNet, RecommenderNetConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type InnerBackend = burn::backend::NdArray;

// ─── Early Stopping ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    /// This epoch is the new best
    Improved,
    /// No improvement, but patience is not exhausted yet
    Wait,
    /// Patience exhausted: stop now
    Stop,
}

/// Tracks the best monitored loss and how many epochs have
/// passed without beating it.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:   usize,
    best_loss:  f64,
    best_epoch: usize,
    stale:      usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best_loss: f64::INFINITY, best_epoch: 0, stale: 0 }
    }

    pub fn update(&mut self, epoch: usize, loss: f64) -> StopDecision {
        if loss < self.best_loss {
            self.best_loss  = loss;
            self.best_epoch = epoch;
            self.stale      = 0;
            return StopDecision::Improved;
        }
        self.stale += 1;
        if self.stale >= self.patience {
            StopDecision::Stop
        } else {
            StopDecision::Wait
        }
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }

    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// Summary of a finished training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs_run:    usize,
    pub best_epoch:    usize,
    pub best_val_mse:  f64,
    pub best_val_rmse: f64,
    pub stopped_early: bool,
    pub history:       Vec<EpochMetrics>,
}

/// The restored best model plus everything needed to persist it.
pub struct TrainingOutcome {
    pub model:        RecommenderNet<InnerBackend>,
    pub model_config: RecommenderNetConfig,
    pub report:       TrainingReport,
}

// ─── Training Loop ────────────────────────────────────────────────────────────

pub fn run_training(
    cfg:    &AppConfig,
    data:   &LoadedRatings,
    logger: &MetricsLogger,
) -> Result<TrainingOutcome> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    TrainBackend::seed(cfg.data.random_state);

    let model_cfg = RecommenderNetConfig::new(
        data.num_users(),
        data.num_items(),
        cfg.model.embedding_dim,
        cfg.model.dense_units.clone(),
    )
    .with_dropout(cfg.model.dropout_rate);

    let mut model: RecommenderNet<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} users, {} movies, embedding_dim={}, dense_units={:?}",
        data.num_users(),
        data.num_items(),
        cfg.model.embedding_dim,
        cfg.model.dense_units,
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Training data loader: shuffled each epoch ─────────────────────────────
    let train_batcher = RatingBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.training.batch_size)
        .shuffle(cfg.data.random_state)
        .build(RatingDataset::from_rows(&data.train));

    // ── Evaluation data loader: fixed order, no autodiff ─────────────────────
    let val_batcher = RatingBatcher::<InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.training.batch_size)
        .build(RatingDataset::from_rows(&data.test));

    let mut stopper    = EarlyStopping::new(cfg.training.early_stopping_patience);
    let mut best_model = None;
    let mut history    = Vec::with_capacity(cfg.training.epochs);
    let mut stopped_early = false;

    for epoch in 1..=cfg.training.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_sse     = 0.0f64;
        let mut train_samples = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.ratings.dims()[0];
            let (loss, _) = model.forward_loss(batch.users, batch.items, batch.ratings);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_sse     += loss_val * batch_len as f64;
            train_samples += batch_len;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.model.learning_rate, model, grads);
        }

        // ── Evaluation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let (val_sse, val_samples) = sum_squared_error(&model_valid, val_loader.iter());

        let metrics = EpochMetrics::new(
            epoch,
            mean_or_nan(train_sse, train_samples),
            mean_or_nan(val_sse, val_samples),
        );
        tracing::info!(
            "Epoch {:>3}/{} | loss={:.4} | rmse={:.4} | val_loss={:.4} | val_rmse={:.4}",
            epoch, cfg.training.epochs,
            metrics.train_loss, metrics.train_rmse,
            metrics.val_loss, metrics.val_rmse,
        );
        logger.log(&metrics)?;

        let decision = stopper.update(epoch, metrics.val_loss);
        history.push(metrics);

        match decision {
            StopDecision::Improved => best_model = Some(model_valid),
            StopDecision::Wait     => {}
            StopDecision::Stop     => {
                tracing::info!(
                    "Early stopping at epoch {}: no improvement since epoch {}",
                    epoch,
                    stopper.best_epoch()
                );
                stopped_early = true;
                break;
            }
        }
    }

    // NaN eval losses never count as improvements; fall back to the last weights.
    let model = best_model.unwrap_or_else(|| model.valid());
    let report = TrainingReport {
        epochs_run:    history.len(),
        best_epoch:    stopper.best_epoch(),
        best_val_mse:  stopper.best_loss(),
        best_val_rmse: stopper.best_loss().sqrt(),
        stopped_early,
        history,
    };

    tracing::info!(
        "Training complete: best epoch {} (val_rmse={:.4})",
        report.best_epoch,
        report.best_val_rmse
    );

    Ok(TrainingOutcome { model, model_config: model_cfg, report })
}

/// Sum of squared errors and sample count over a batch stream.
pub fn sum_squared_error<B, I>(model: &RecommenderNet<B>, batches: I) -> (f64, usize)
where
    B: Backend,
    I: Iterator<Item = crate::data::batcher::RatingBatch<B>>,
{
    let mse = MseLoss::new();
    let mut sse     = 0.0f64;
    let mut samples = 0usize;

    for batch in batches {
        samples += batch.ratings.dims()[0];
        let predictions = model.forward(batch.users, batch.items);
        let batch_sse: f64 = mse
            .forward(predictions, batch.ratings, Reduction::Sum)
            .into_scalar()
            .elem::<f64>();
        sse += batch_sse;
    }
    (sse, samples)
}

fn mean_or_nan(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}
