use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// One sample per finished request. Status code 0 marks a transport failure.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub start: Instant,
    pub response_time: Duration,
    pub status_code: u16,
    pub timed_out: bool,
}

impl Metrics {
    #[must_use]
    pub fn new(start: Instant, status_code: u16, timed_out: bool) -> Self {
        Self {
            start,
            response_time: start.elapsed(),
            status_code,
            timed_out,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub duration_ms: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_requests: u64,
    pub timeout_requests: u64,
    pub transport_errors: u64,
    pub non_expected_status: u64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub avg_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p90_latency_ms: u64,
    pub p99_latency_ms: u64,
    pub success_min_latency_ms: u64,
    pub success_max_latency_ms: u64,
    pub success_avg_latency_ms: u64,
    pub success_p50_latency_ms: u64,
    pub success_p90_latency_ms: u64,
    pub success_p99_latency_ms: u64,
}

#[derive(Debug)]
pub struct MetricsReport {
    pub summary: MetricsSummary,
}
