use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "crudy_restaurants_http_requests_total",
        "Total HTTP requests handled"
    )
    .expect("register http_requests_total")
});

pub static WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "crudy_restaurants_writes_total",
        "Successful restaurant writes by operation",
        &["op"]
    )
    .expect("register writes_total")
});

pub fn record_write(op: &str) {
    WRITES_TOTAL.with_label_values(&[op]).inc();
}

pub async fn count_requests(req: Request, next: Next) -> Response {
    HTTP_REQUESTS_TOTAL.inc();
    next.run(req).await
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
