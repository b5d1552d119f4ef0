// ============================================================
// Pipeline Configuration
// ============================================================
// Typed view of the YAML file that drives a training run:
//
//   data:
//     path: data/ratings.csv
//     metadata_path: data/movies.csv   # optional
//     test_size: 0.2
//     random_state: 42
//   model:
//     embedding_dim: 32
//     dense_units: [64, 32]
//     dropout_rate: 0.2
//     learning_rate: 0.001
//   training:
//     batch_size: 64
//     epochs: 20
//     early_stopping_patience: 3
//     artifact_dir: trained_model      # optional
//     log_dir: logs                    # optional
//
// `AppConfig::from_file` parses AND validates, so no pipeline
// stage ever sees an out-of-range value.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub data:     DataConfig,
    pub model:    ModelConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Ratings CSV (`userId,movieId,rating[,timestamp]`)
    pub path: String,

    /// Optional movie metadata CSV joined on `movieId`
    #[serde(default)]
    pub metadata_path: Option<String>,

    /// Fraction of rows held out for evaluation, strictly inside (0, 1)
    pub test_size: f64,

    /// Seed for the split and the training shuffle
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub embedding_dim: usize,
    /// Widths of the hidden dense layers, applied in order
    pub dense_units:   Vec<usize>,
    pub dropout_rate:  f64,
    pub learning_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    pub batch_size:              usize,
    pub epochs:                  usize,
    pub early_stopping_patience: usize,

    /// Where the trained artifact is written (overwritten each run)
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,

    /// Where per-epoch metrics are appended
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_artifact_dir() -> String {
    "trained_model".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl AppConfig {
    /// Read, parse and validate a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data.validate()?;
        self.model.validate()?;
        self.training.validate()
    }
}

impl DataConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::invalid("data.path", "must not be empty"));
        }
        // NaN fails both comparisons, so it is rejected too
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigError::invalid(
                "data.test_size",
                format!("{} is not strictly between 0 and 1", self.test_size),
            ));
        }
        Ok(())
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::invalid("model.embedding_dim", "must be positive"));
        }
        if let Some(pos) = self.dense_units.iter().position(|&u| u == 0) {
            return Err(ConfigError::invalid(
                "model.dense_units",
                format!("layer {pos} has zero width"),
            ));
        }
        if !(0.0..=1.0).contains(&self.dropout_rate) {
            return Err(ConfigError::invalid(
                "model.dropout_rate",
                format!("{} is outside [0, 1]", self.dropout_rate),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::invalid(
                "model.learning_rate",
                format!("{} is not a positive number", self.learning_rate),
            ));
        }
        Ok(())
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("training.batch_size", "must be positive"));
        }
        if self.epochs == 0 {
            return Err(ConfigError::invalid("training.epochs", "must be positive"));
        }
        Ok(())
    }
}
