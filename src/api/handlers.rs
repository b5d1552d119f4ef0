use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

use crate::api::{
    error::{ApiError, ApiResult},
    metrics::CONTENT_TYPE,
    state::AppContext,
};

pub const PREDICT_ENDPOINT: &str = "/predict";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub user_id:          String,
    pub movie_title:      String,
    pub predicted_rating: f32,
}

/// Handler for the prediction endpoint.
///
/// Every call is counted and timed; failures are also counted
/// by error type before being turned into a JSON error body.
pub async fn predict(
    State(ctx): State<AppContext>,
    payload:    Result<Json<Value>, JsonRejection>,
) -> Response {
    ctx.metrics.record_request(PREDICT_ENDPOINT, "POST");
    let started = Instant::now();

    let result = predict_inner(&ctx, payload);

    ctx.metrics
        .observe_latency(PREDICT_ENDPOINT, started.elapsed().as_secs_f64());

    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            ctx.metrics.record_error(err.metric_label());
            tracing::debug!("Rejected prediction request: {}", err);
            err.into_response()
        }
    }
}

fn predict_inner(
    ctx:     &AppContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PredictResponse> {
    let Json(body) = payload.map_err(|e| ApiError::JsonParsing(e.body_text()))?;

    let user_id     = required_id(&body, "user_id")?;
    let movie_title = required_id(&body, "movie_title")?;

    let predicted_rating = ctx.predictions.predict(&user_id, &movie_title)?;

    Ok(PredictResponse { user_id, movie_title, predicted_rating })
}

/// Pull an identifier field out of the request body.
/// Strings are taken as-is; integers are accepted as their
/// decimal text since ratings files key users numerically.
fn required_id(body: &Value, field: &str) -> ApiResult<String> {
    match body.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        Some(Value::Null) | None => {
            Err(ApiError::InvalidInput(format!("Missing required field '{field}'")))
        }
        Some(_) => Err(ApiError::InvalidInput(format!(
            "Field '{field}' must be a non-empty string"
        ))),
    }
}

/// Prometheus scrape endpoint
pub async fn metrics(State(ctx): State<AppContext>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], ctx.metrics.render())
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
