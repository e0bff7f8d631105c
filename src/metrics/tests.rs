use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use super::*;
use crate::error::{AppError, AppResult};

fn sample(latency_ms: u64, status_code: u16, timed_out: bool) -> Metrics {
    Metrics {
        start: Instant::now(),
        response_time: Duration::from_millis(latency_ms),
        status_code,
        timed_out,
    }
}

#[test]
fn histogram_rounds_up_and_zeroes_when_empty() -> AppResult<()> {
    let mut hist = LatencyHistogram::new().map_err(AppError::metrics)?;
    if hist.percentiles() != (0, 0, 0) {
        return Err(AppError::metrics("Expected zeroed percentiles"));
    }
    if hist.min() != 0 || hist.max() != 0 {
        return Err(AppError::metrics("Expected zeroed min/max"));
    }

    hist.record(0);
    if hist.min() != 1 || hist.max() != 1 {
        return Err(AppError::metrics("Expected sub-millisecond rounding to 1"));
    }
    if hist.count() != 1 {
        return Err(AppError::metrics("Unexpected count"));
    }
    Ok(())
}

#[tokio::test]
async fn collector_aggregates_samples() -> AppResult<()> {
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(4);
    let (metrics_tx, metrics_rx) = mpsc::channel(16);
    let run_start = Instant::now();

    let handle = setup_metrics_collector(
        200,
        Duration::from_secs(30),
        run_start,
        &shutdown_tx,
        metrics_rx,
    )?;

    for metrics in [
        sample(10, 200, false),
        sample(20, 200, false),
        sample(30, 500, false),
        sample(40, 0, true),
        sample(50, 0, false),
    ] {
        metrics_tx
            .send(metrics)
            .await
            .map_err(|_| AppError::metrics("Failed to send sample"))?;
    }
    drop(metrics_tx);

    let summary = handle.await?.summary;

    if summary.total_requests != 5 {
        return Err(AppError::metrics(format!(
            "Unexpected total: {}",
            summary.total_requests
        )));
    }
    if summary.successful_requests != 2 {
        return Err(AppError::metrics(format!(
            "Unexpected successes: {}",
            summary.successful_requests
        )));
    }
    if summary.non_expected_status != 1 {
        return Err(AppError::metrics(format!(
            "Unexpected non-expected count: {}",
            summary.non_expected_status
        )));
    }
    if summary.timeout_requests != 1 {
        return Err(AppError::metrics(format!(
            "Unexpected timeouts: {}",
            summary.timeout_requests
        )));
    }
    if summary.transport_errors != 1 {
        return Err(AppError::metrics(format!(
            "Unexpected transport errors: {}",
            summary.transport_errors
        )));
    }
    if summary.error_requests != 3 {
        return Err(AppError::metrics(format!(
            "Unexpected error total: {}",
            summary.error_requests
        )));
    }
    if summary.avg_latency_ms != 30 {
        return Err(AppError::metrics(format!(
            "Unexpected avg latency: {}",
            summary.avg_latency_ms
        )));
    }
    if summary.success_avg_latency_ms != 15 {
        return Err(AppError::metrics(format!(
            "Unexpected success avg latency: {}",
            summary.success_avg_latency_ms
        )));
    }
    if summary.success_max_latency_ms != 20 {
        return Err(AppError::metrics(format!(
            "Unexpected success max latency: {}",
            summary.success_max_latency_ms
        )));
    }
    Ok(())
}

#[tokio::test]
async fn collector_reports_zeroes_without_samples() -> AppResult<()> {
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(4);
    let (metrics_tx, metrics_rx) = mpsc::channel::<Metrics>(4);
    let run_start = Instant::now();

    let handle = setup_metrics_collector(
        200,
        Duration::from_secs(30),
        run_start,
        &shutdown_tx,
        metrics_rx,
    )?;
    drop(metrics_tx);

    let summary = handle.await?.summary;
    if summary.total_requests != 0 || summary.successful_requests != 0 {
        return Err(AppError::metrics("Expected an empty summary"));
    }
    if summary.avg_latency_ms != 0 || summary.p99_latency_ms != 0 {
        return Err(AppError::metrics("Expected zeroed latencies"));
    }
    Ok(())
}

#[tokio::test]
async fn collector_stops_on_shutdown_signal() -> AppResult<()> {
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(4);
    let (metrics_tx, metrics_rx) = mpsc::channel(16);
    let run_start = Instant::now();

    let handle = setup_metrics_collector(
        200,
        Duration::from_secs(600),
        run_start,
        &shutdown_tx,
        metrics_rx,
    )?;

    metrics_tx
        .send(sample(5, 200, false))
        .await
        .map_err(|_| AppError::metrics("Failed to send sample"))?;
    drop(shutdown_tx.send(()));

    let summary = handle.await?.summary;
    // The queued sample is drained even when shutdown wins the race.
    if summary.total_requests != 1 {
        return Err(AppError::metrics(format!(
            "Unexpected total: {}",
            summary.total_requests
        )));
    }
    drop(metrics_tx);
    Ok(())
}
