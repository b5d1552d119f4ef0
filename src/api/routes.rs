use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppContext};

/// Creates the application router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route(handlers::PREDICT_ENDPOINT, post(handlers::predict))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
