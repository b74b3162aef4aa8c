use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::restaurant::repository::RestaurantRepository;
use service::RestaurantService;

use crate::metrics;
use crate::openapi::ApiDoc;

pub mod restaurants;

/// Shared handler state; the repository behind the service is picked at startup.
#[derive(Clone)]
pub struct ServerState {
    pub restaurants: Arc<RestaurantService<dyn RestaurantRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { restaurants: Arc::new(RestaurantService::new(repo)) }
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: restaurant API, health, metrics and API docs
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let ambient = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(|| async { metrics::encode_metrics() }))
        .route("/api-docs/openapi.json", get(openapi_json));

    ambient
        .nest("/restaurants", restaurants::router())
        .with_state(state)
        .layer(middleware::from_fn(metrics::count_requests))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
