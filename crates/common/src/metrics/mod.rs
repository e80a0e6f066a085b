//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions for the
//! review-workflow operations.

use crate::db::models::PaperStatus;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ReviewFlow metrics
pub const METRICS_PREFIX: &str = "reviewflow";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_bids_total", METRICS_PREFIX),
        Unit::Count,
        "Total bids recorded"
    );

    describe_counter!(
        format!("{}_assignments_total", METRICS_PREFIX),
        Unit::Count,
        "Total reviewer assignments created"
    );

    describe_counter!(
        format!("{}_finalizations_total", METRICS_PREFIX),
        Unit::Count,
        "Total papers finalized"
    );

    describe_counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total calls to the Users and Submissions systems"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "External system call latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record one bid, by stated preference
pub fn record_bid(preference: &str) {
    counter!(
        format!("{}_bids_total", METRICS_PREFIX),
        "preference" => preference.to_string()
    )
    .increment(1);
}

/// Record reviewer assignments created by one operation
pub fn record_assignment(count: usize, mode: &str) {
    counter!(
        format!("{}_assignments_total", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .increment(count as u64);
}

/// Record a paper finalization by outcome
pub fn record_finalization(status: PaperStatus) {
    let outcome: String = status.into();
    counter!(
        format!("{}_finalizations_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one call to an external system
pub fn record_upstream_call(service: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        "service" => service.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        "service" => service.to_string()
    )
    .record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("GET", "/v1/tracks/1/2/phase");
        std::thread::sleep(std::time::Duration::from_millis(5));
        metrics.finish(200);
        // Just verify it runs without panic
    }

    #[test]
    fn test_record_helpers_do_not_panic() {
        record_bid("CAN_REVIEW");
        record_assignment(3, "auto");
        record_finalization(PaperStatus::Accepted);
        record_upstream_call("users", 0.01, true);
    }
}
