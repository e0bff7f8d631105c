mod summary;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::info;

use crate::args::{LoadArgs, OutputFormat};
use crate::error::AppResult;
use crate::http::sender::{build_client, create_sender_task};
use crate::http::workload::{build_request, build_request_spec};
use crate::metrics::setup_metrics_collector;

const METRICS_CHANNEL_CAPACITY: usize = 65_536;
const SHUTDOWN_CHANNEL_CAPACITY: usize = 16;

pub(crate) async fn run_load(args: &LoadArgs) -> AppResult<()> {
    let spec = build_request_spec(args)?;
    let client = build_client(args)?;
    let request = Arc::new(build_request(&client, &spec)?);

    info!(
        "Starting load: {} {} ({} workers)",
        spec.method.as_str(),
        spec.url,
        args.concurrency.get()
    );

    let (shutdown_tx, _shutdown_rx) = broadcast::channel(SHUTDOWN_CHANNEL_CAPACITY);
    let (metrics_tx, metrics_rx) = mpsc::channel(METRICS_CHANNEL_CAPACITY);
    let run_start = Instant::now();

    let collector = setup_metrics_collector(
        args.expected_status_code,
        Duration::from_secs(args.target_duration.get()),
        run_start,
        &shutdown_tx,
        metrics_rx,
    )?;
    let sender = create_sender_task(args, &shutdown_tx, &metrics_tx, client, request);
    drop(metrics_tx);

    sender.await?;
    let report = collector.await?;

    match args.output {
        OutputFormat::Text => summary::print_summary(&report.summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.summary)?),
    }
    Ok(())
}
