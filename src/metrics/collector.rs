use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{AppError, AppResult, MetricsError};
use crate::shutdown::ShutdownSender;

use super::{LatencyHistogram, Metrics, MetricsReport, MetricsSummary};

struct AggregationState {
    expected_status_code: u16,
    total_requests: u64,
    successful_requests: u64,
    timeout_requests: u64,
    transport_errors: u64,
    non_expected_status: u64,
    latency_sum_ms: u128,
    success_latency_sum_ms: u128,
    all_latencies: LatencyHistogram,
    success_latencies: LatencyHistogram,
}

impl AggregationState {
    fn new(expected_status_code: u16) -> Result<Self, MetricsError> {
        Ok(Self {
            expected_status_code,
            total_requests: 0,
            successful_requests: 0,
            timeout_requests: 0,
            transport_errors: 0,
            non_expected_status: 0,
            latency_sum_ms: 0,
            success_latency_sum_ms: 0,
            all_latencies: LatencyHistogram::new()?,
            success_latencies: LatencyHistogram::new()?,
        })
    }

    fn record(&mut self, metrics: &Metrics) {
        let latency_ms = u64::try_from(metrics.response_time.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        self.total_requests = self.total_requests.saturating_add(1);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        self.all_latencies.record(latency_ms);

        if metrics.timed_out {
            self.timeout_requests = self.timeout_requests.saturating_add(1);
        } else if metrics.status_code == 0 {
            self.transport_errors = self.transport_errors.saturating_add(1);
        } else if metrics.status_code == self.expected_status_code {
            self.successful_requests = self.successful_requests.saturating_add(1);
            self.success_latency_sum_ms = self
                .success_latency_sum_ms
                .saturating_add(u128::from(latency_ms));
            self.success_latencies.record(latency_ms);
        } else {
            self.non_expected_status = self.non_expected_status.saturating_add(1);
        }
    }

    fn finalize(self, run_duration: Duration) -> MetricsSummary {
        let error_requests = self
            .timeout_requests
            .saturating_add(self.transport_errors)
            .saturating_add(self.non_expected_status);
        let (p50, p90, p99) = self.all_latencies.percentiles();
        let (success_p50, success_p90, success_p99) = self.success_latencies.percentiles();

        MetricsSummary {
            duration_ms: u64::try_from(run_duration.as_millis()).unwrap_or(u64::MAX),
            total_requests: self.total_requests,
            successful_requests: self.successful_requests,
            error_requests,
            timeout_requests: self.timeout_requests,
            transport_errors: self.transport_errors,
            non_expected_status: self.non_expected_status,
            min_latency_ms: self.all_latencies.min(),
            max_latency_ms: self.all_latencies.max(),
            avg_latency_ms: average_ms(self.latency_sum_ms, self.total_requests),
            p50_latency_ms: p50,
            p90_latency_ms: p90,
            p99_latency_ms: p99,
            success_min_latency_ms: self.success_latencies.min(),
            success_max_latency_ms: self.success_latencies.max(),
            success_avg_latency_ms: average_ms(
                self.success_latency_sum_ms,
                self.successful_requests,
            ),
            success_p50_latency_ms: success_p50,
            success_p90_latency_ms: success_p90,
            success_p99_latency_ms: success_p99,
        }
    }
}

fn average_ms(sum_ms: u128, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    let avg = sum_ms.checked_div(u128::from(count)).unwrap_or(0);
    u64::try_from(avg).unwrap_or(u64::MAX)
}

/// Aggregate request samples until the target duration elapses, a shutdown
/// is signalled, or the sample channel closes. Remaining queued samples are
/// drained before the report is produced.
pub(crate) fn setup_metrics_collector(
    expected_status_code: u16,
    target_duration: Duration,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
    mut metrics_rx: mpsc::Receiver<Metrics>,
) -> AppResult<JoinHandle<MetricsReport>> {
    let state = AggregationState::new(expected_status_code).map_err(AppError::metrics)?;
    let shutdown_tx_main = shutdown_tx.clone();

    Ok(tokio::spawn(async move {
        let mut state = state;
        let mut shutdown_rx = shutdown_tx_main.subscribe();
        let shutdown_timer = tokio::time::sleep(target_duration);
        tokio::pin!(shutdown_timer);

        loop {
            tokio::select! {
                () = &mut shutdown_timer => {
                    drop(shutdown_tx_main.send(()));
                    break;
                },
                _ = shutdown_rx.recv() => break,
                maybe_msg = metrics_rx.recv() => {
                    match maybe_msg {
                        Some(msg) => state.record(&msg),
                        None => {
                            drop(shutdown_tx_main.send(()));
                            break;
                        }
                    }
                },
            }
        }

        while let Ok(msg) = metrics_rx.try_recv() {
            state.record(&msg);
        }

        MetricsReport {
            summary: state.finalize(run_start.elapsed()),
        }
    }))
}
