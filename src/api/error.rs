use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::PredictionError;

/// Per-request failures of the prediction API.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid JSON body: {0}")]
    JsonParsing(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Label used for the `request_errors_total` counter.
    pub fn metric_label(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::JsonParsing(_)  => "json_parsing_error",
            ApiError::NotFound(_)     => "invalid_id",
            ApiError::Internal(_)     => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::JsonParsing(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::UnknownUser(_) | PredictionError::UnknownItem(_) => {
                ApiError::NotFound(err.to_string())
            }
            PredictionError::NonFinite | PredictionError::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status  = self.status();
        let message = match &self {
            // Details go to the log, not to the client
            ApiError::Internal(detail) => {
                tracing::error!("Prediction failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
