// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load + index + split ratings  (Layer 4 - data)
//   Step 2: Open the metrics log          (Layer 6 - infra)
//   Step 3: Train with early stopping     (Layer 5 - ml)
//   Step 4: Persist model + index maps    (Layer 6 - infra)
//
// The artifact is written only after training finishes. An
// interrupted run leaves the previous artifact either in place
// or set aside next to it as `.<artifact_dir>.previous`.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::AppConfig;
use crate::data::loader::load_data;
use crate::infra::{checkpoint::ArtifactStore, metrics::MetricsLogger};
use crate::ml::trainer::{run_training, TrainingReport};

pub struct TrainUseCase {
    config: AppConfig,
}

impl TrainUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Read and validate the YAML config before anything else runs.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = AppConfig::from_file(path.as_ref())
            .with_context(|| format!("Invalid configuration '{}'", path.as_ref().display()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Load, index, join, split ──────────────────────────────────
        tracing::info!("Loading ratings from '{}'", cfg.data.path);
        let data = load_data(&cfg.data)
            .with_context(|| format!("Cannot load ratings from '{}'", cfg.data.path))?;

        // ── Step 2: Metrics log ───────────────────────────────────────────────
        let logger = MetricsLogger::new(&cfg.training.log_dir)
            .with_context(|| format!("Cannot open log dir '{}'", cfg.training.log_dir))?;

        // ── Step 3: Train ─────────────────────────────────────────────────────
        let outcome = run_training(cfg, &data, &logger)?;

        // ── Step 4: Persist ───────────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.training.artifact_dir);
        store
            .save(&outcome.model, &outcome.model_config, &data.users, &data.items)
            .context("Cannot save trained artifact")?;

        let report_path = Path::new(&cfg.training.log_dir).join("training_report.json");
        std::fs::write(&report_path, serde_json::to_string_pretty(&outcome.report)?)
            .with_context(|| format!("Cannot write '{}'", report_path.display()))?;

        Ok(outcome.report)
    }
}
