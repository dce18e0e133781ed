//! Prometheus scrape endpoint
//!
//! Renders whatever the global `metrics-exporter-prometheus` recorder has
//! collected: HTTP counters plus the booking counters emitted by the
//! services (`bookings_created_total`, `booking_conflicts_total`, ...).

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics` (no auth)
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
