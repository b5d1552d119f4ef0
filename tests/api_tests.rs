use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use movie_recommender::api::{create_router, AppContext};
use movie_recommender::application::predict_use_case::PredictUseCase;
use movie_recommender::domain::{index_map::IdIndex, rating::MovieMetadata};
use movie_recommender::infra::catalog::Catalog;
use movie_recommender::ml::{
    inferencer::{InferBackend, Predictor},
    model::RecommenderNetConfig,
};

fn movie(id: &str, title: &str) -> MovieMetadata {
    MovieMetadata {
        movie_id:     id.to_string(),
        title:        title.to_string(),
        genres:       None,
        release_date: None,
    }
}

fn create_test_context() -> AppContext {
    let device = Default::default();
    let model  = RecommenderNetConfig::new(3, 2, 8, vec![16, 8]).init::<InferBackend>(&device);
    let predictor = Predictor::new(
        model,
        IdIndex::from_observed(["user_1", "user_2", "7"]),
        IdIndex::from_observed(["1", "2"]),
    );
    let catalog = Catalog::from_metadata(vec![
        movie("1", "Toy Story (1995)"),
        movie("2", "Jumanji (1995)"),
        // In the catalog but never rated during training
        movie("3", "Grumpier Old Men (1995)"),
    ]);
    AppContext::new(PredictUseCase::new(Arc::new(predictor), catalog))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status   = response.status();
    let bytes    = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_predict(ctx: &AppContext, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = send(create_router(ctx.clone()), request).await;
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let ctx = create_test_context();
    let (status, body) = send(
        create_router(ctx),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_known_pair_returns_finite_rating() {
    let ctx = create_test_context();
    let (status, body) = post_predict(
        &ctx,
        json!({ "user_id": "user_1", "movie_title": "Toy Story (1995)" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "user_1");
    assert_eq!(body["movie_title"], "Toy Story (1995)");
    let rating = body["predicted_rating"].as_f64().unwrap();
    assert!(rating.is_finite());
}

#[tokio::test]
async fn test_numeric_user_id_is_accepted() {
    let ctx = create_test_context();
    let (status, body) = post_predict(&ctx, json!({ "user_id": 7, "movie_title": "Jumanji (1995)" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "7");
}

#[tokio::test]
async fn test_unknown_movie_returns_404() {
    let ctx = create_test_context();
    let (status, body) = post_predict(
        &ctx,
        json!({ "user_id": "user_1", "movie_title": "UnknownMovie" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_movie_without_training_data_returns_404() {
    let ctx = create_test_context();
    let (status, _) = post_predict(
        &ctx,
        json!({ "user_id": "user_1", "movie_title": "Grumpier Old Men (1995)" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_user_returns_404() {
    let ctx = create_test_context();
    let (status, body) = post_predict(
        &ctx,
        json!({ "user_id": "user_999", "movie_title": "Toy Story (1995)" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("user_999"));
}

#[tokio::test]
async fn test_missing_movie_title_returns_400() {
    let ctx = create_test_context();
    let (status, body) = post_predict(&ctx, json!({ "user_id": "user_1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("movie_title"));
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let ctx = create_test_context();
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, text) = send(create_router(ctx.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(body["error"].is_string());
    assert_eq!(ctx.metrics.error_count("json_parsing_error"), 1);
}

#[tokio::test]
async fn test_metrics_reflect_requests_and_errors() {
    let ctx = create_test_context();
    post_predict(&ctx, json!({ "user_id": "user_1", "movie_title": "Toy Story (1995)" })).await;
    post_predict(&ctx, json!({ "user_id": "user_1", "movie_title": "UnknownMovie" })).await;
    post_predict(&ctx, json!({ "movie_title": "Toy Story (1995)" })).await;

    let response = create_router(ctx.clone())
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text  = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("request_count_total{endpoint=\"/predict\",method=\"POST\"} 3"));
    assert!(text.contains("request_errors_total{error_type=\"invalid_id\"} 1"));
    assert!(text.contains("request_errors_total{error_type=\"invalid_input\"} 1"));
    assert!(text.contains("request_latency_seconds_count{endpoint=\"/predict\"} 3"));
}
