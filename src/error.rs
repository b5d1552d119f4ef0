use std::path::PathBuf;

/// Configuration file could not be read or failed validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config '{path}': {source}")]
    Parse {
        path:   PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

/// Ratings or metadata could not be loaded or split.
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid rating {rating} on row {row} of '{path}'")]
    InvalidRating { path: PathBuf, row: usize, rating: f32 },

    #[error("Ratings table '{0}' is empty")]
    Empty(PathBuf),

    #[error("Cannot split {rows} rows with test_size={test_size}: one partition would be empty")]
    SplitTooSmall { rows: usize, test_size: f64 },
}

/// The trained artifact could not be written or read back.
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact I/O error at '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact metadata '{path}' is invalid: {source}")]
    Json {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot record model weights at '{path}': {reason}")]
    Recorder { path: PathBuf, reason: String },

    #[error("Artifact is inconsistent: {0}")]
    Mismatch(String),
}

/// A single prediction failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Unknown user id: {0}")]
    UnknownUser(String),

    #[error("Unknown movie: {0}")]
    UnknownItem(String),

    #[error("Model produced a non-finite rating")]
    NonFinite,

    #[error("Prediction failed: {0}")]
    Internal(String),
}
