use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use once_cell::sync::OnceCell;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use tracing::error;

pub const METRICS_PATH: &str = "/metrics";

/// Counters exported by the booking gateway.
pub struct GatewayMetrics {
    pub http_requests_total: IntCounterVec,
    pub backend_failures_total: IntCounterVec,
}

impl GatewayMetrics {
    /// Touches every known label so the series show up before the first hit.
    pub fn on_startup(&self, paths: &[&str]) {
        for path in paths {
            self.http_requests_total.with_label_values(&[path]).inc_by(0);
        }
    }

    pub fn inc_request(&self, path: &str) {
        self.http_requests_total.with_label_values(&[path]).inc();
    }

    pub fn inc_backend_failure(&self, route: &str) {
        self.backend_failures_total.with_label_values(&[route]).inc();
    }
}

static GATEWAY_METRICS: OnceCell<GatewayMetrics> = OnceCell::new();

pub fn gateway_metrics() -> &'static GatewayMetrics {
    GATEWAY_METRICS.get_or_init(|| GatewayMetrics {
        http_requests_total: register_int_counter_vec!(
            "gateway_http_requests_total",
            "HTTP requests handled by the gateway, by route",
            &["path"]
        )
        .expect("register gateway_http_requests_total"),
        backend_failures_total: register_int_counter_vec!(
            "gateway_backend_failures_total",
            "Proxy calls that failed to reach or decode the booking backend",
            &["route"]
        )
        .expect("register gateway_backend_failures_total"),
    })
}

pub async fn metrics_handler() -> Response {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        error!(%err, "metrics: encode failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let body = match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => {
            error!(%err, "metrics: invalid UTF-8");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response()
}
