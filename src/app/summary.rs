use crate::metrics::MetricsSummary;

pub(crate) struct SummaryStats {
    pub(crate) success_rate_x100: u64,
    pub(crate) avg_rps_x100: u64,
}

pub(crate) fn compute_summary_stats(summary: &MetricsSummary) -> SummaryStats {
    let duration_ms = u128::from(summary.duration_ms).max(1);
    let total = summary.total_requests;
    let success = summary.successful_requests;

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(success)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    let avg_rps_x100 = if total > 0 {
        let scaled = u128::from(total)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    SummaryStats {
        success_rate_x100,
        avg_rps_x100,
    }
}

pub(crate) fn print_summary(summary: &MetricsSummary) {
    let stats = compute_summary_stats(summary);

    println!(
        "Duration: {}.{:03}s",
        summary.duration_ms / 1000,
        summary.duration_ms % 1000
    );
    println!("Total Requests: {}", summary.total_requests);
    println!(
        "Successful: {} ({}.{:02}%)",
        summary.successful_requests,
        stats.success_rate_x100 / 100,
        stats.success_rate_x100 % 100
    );
    println!("Errors: {}", summary.error_requests);
    println!("Timeouts: {}", summary.timeout_requests);
    println!("Transport Errors: {}", summary.transport_errors);
    println!("Non-Expected Status: {}", summary.non_expected_status);
    println!("Avg Latency (all): {}ms", summary.avg_latency_ms);
    println!("Avg Latency (ok): {}ms", summary.success_avg_latency_ms);
    println!(
        "Min/Max Latency (all): {}ms / {}ms",
        summary.min_latency_ms, summary.max_latency_ms
    );
    println!(
        "Min/Max Latency (ok): {}ms / {}ms",
        summary.success_min_latency_ms, summary.success_max_latency_ms
    );
    println!(
        "P50/P90/P99 Latency (all): {}ms / {}ms / {}ms",
        summary.p50_latency_ms, summary.p90_latency_ms, summary.p99_latency_ms
    );
    println!(
        "P50/P90/P99 Latency (ok): {}ms / {}ms / {}ms",
        summary.success_p50_latency_ms,
        summary.success_p90_latency_ms,
        summary.success_p99_latency_ms
    );
    println!(
        "Avg RPS: {}.{:02}",
        stats.avg_rps_x100 / 100,
        stats.avg_rps_x100 % 100
    );
}
