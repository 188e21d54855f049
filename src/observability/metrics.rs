//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): handled requests by route, status
//! - `upstream_requests_total` (counter): outbound calls by service, outcome
//! - `upstream_request_duration_seconds` (histogram): outbound latency
//! - `sessions_active` (gauge): live sessions in the session store
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled API request.
pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record one outbound call and its latency.
pub fn record_upstream(service: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "upstream_requests_total",
        "service" => service,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("upstream_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record the current number of sessions.
pub fn record_sessions(count: usize) {
    metrics::gauge!("sessions_active").set(count as f64);
}
