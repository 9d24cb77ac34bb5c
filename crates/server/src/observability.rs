use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("persons_requests_total", "Total requests reaching the persons API")
        .expect("register requests_total")
});

pub static AUTH_REJECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("persons_auth_rejections_total", "Total requests rejected by the credential gate")
        .expect("register auth_rejections_total")
});

pub static STORAGE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("persons_storage_failures_total", "Total mutations that failed to persist")
        .expect("register storage_failures_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    // Touch the counters so they are exported before first use.
    Lazy::force(&REQUESTS_TOTAL);
    Lazy::force(&AUTH_REJECTIONS_TOTAL);
    Lazy::force(&STORAGE_FAILURES_TOTAL);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
