//! Per-request samples and end-of-run aggregation.
mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use histogram::LatencyHistogram;
pub use types::{Metrics, MetricsReport, MetricsSummary};

pub(crate) use collector::setup_metrics_collector;
