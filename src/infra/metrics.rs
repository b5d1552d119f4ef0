// ============================================================
// Layer 6 — Training Metrics Logger
// ============================================================
// Appends one row per epoch to `<log_dir>/metrics.csv`:
//
//   epoch,train_loss,train_rmse,val_loss,val_rmse
//   1,1.84321,1.357649,1.102934,1.050207
//
// Loss is MSE, so rmse = sqrt(loss). The file accumulates rows
// across runs; the header goes in only when the file is new.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_rmse: f64,
    pub val_loss:   f64,
    pub val_rmse:   f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64) -> Self {
        Self {
            epoch,
            train_loss,
            train_rmse: train_loss.sqrt(),
            val_loss,
            val_rmse:   val_loss.sqrt(),
        }
    }
}

/// Stand-in for a TensorBoard writer: a CSV a notebook or
/// spreadsheet can plot directly.
pub struct MetricsLogger {
    path: PathBuf,
}

impl MetricsLogger {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create log dir '{}'", dir.display()))?;
        Ok(Self { path: dir.join("metrics.csv") })
    }

    pub fn log(&self, metrics: &EpochMetrics) -> Result<()> {
        let fresh = !self.path.exists();
        let file  = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(fresh).from_writer(file);
        writer.serialize(metrics)?;
        writer.flush()?;

        if fresh {
            tracing::debug!("Started metrics log at '{}'", self.path.display());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
