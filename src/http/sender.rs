use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use reqwest::{Client, Request};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::args::LoadArgs;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::Metrics;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

pub(crate) fn build_client(args: &LoadArgs) -> AppResult<Client> {
    Client::builder()
        .timeout(args.request_timeout)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

/// Lock-free request budget shared by all workers.
#[derive(Debug)]
struct RequestLimiter {
    limit: u64,
    counter: AtomicU64,
}

impl RequestLimiter {
    fn new(limit: Option<u64>) -> Option<Self> {
        limit.map(|limit| RequestLimiter {
            limit,
            counter: AtomicU64::new(0),
        })
    }

    fn try_reserve(&self) -> bool {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            if current >= self.limit {
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                return false;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }
}

async fn preflight_request(client: &Client, request: &Request) -> AppResult<()> {
    let probe = request
        .try_clone()
        .ok_or_else(|| AppError::http(HttpError::CloneRequestFailed))?;
    client
        .execute(probe)
        .await
        .map_err(|err| AppError::http(HttpError::TestRequestFailed { source: err }))?;
    Ok(())
}

/// Spawn the worker fleet behind a single supervising task. The supervisor
/// runs one preflight request, then workers loop until shutdown or until the
/// request budget is spent.
pub(crate) fn create_sender_task(
    args: &LoadArgs,
    shutdown_tx: &ShutdownSender,
    metrics_tx: &mpsc::Sender<Metrics>,
    client: Client,
    request: Arc<Request>,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let metrics_tx = metrics_tx.clone();
    let max_tasks = args.concurrency.get();
    let request_limiter = RequestLimiter::new(args.requests.map(u64::from)).map(Arc::new);

    tokio::spawn(async move {
        if let Err(err) = preflight_request(&client, &request).await {
            error!("Test request failed: {}", err);
            drop(shutdown_tx.send(()));
            return;
        }

        let mut worker_handles = Vec::with_capacity(max_tasks);
        for _ in 0..max_tasks {
            let shutdown_tx = shutdown_tx.clone();
            let metrics_tx = metrics_tx.clone();
            let client = client.clone();
            let request = Arc::clone(&request);
            let request_limiter = request_limiter.clone();

            let handle = tokio::spawn(async move {
                let mut shutdown_rx = shutdown_tx.subscribe();
                loop {
                    let should_break = run_single_iteration(
                        &mut shutdown_rx,
                        &client,
                        &metrics_tx,
                        request_limiter.as_deref(),
                        &request,
                    )
                    .await;

                    if should_break {
                        drop(shutdown_tx.send(()));
                        break;
                    }
                }
            });

            worker_handles.push(handle);
        }

        for handle in worker_handles {
            if handle.await.is_err() {
                break;
            }
        }
    })
}

/// One request iteration. Returns true when the worker should stop.
async fn run_single_iteration(
    shutdown_rx: &mut ShutdownReceiver,
    client: &Client,
    metrics_tx: &mpsc::Sender<Metrics>,
    request_limiter: Option<&RequestLimiter>,
    request_template: &Request,
) -> bool {
    if let Some(limiter) = request_limiter {
        if !limiter.try_reserve() {
            return true;
        }
    }

    let Some(request) = request_template.try_clone() else {
        error!("Failed to clone request template.");
        return true;
    };

    let start = Instant::now();
    tokio::select! {
        _ = shutdown_rx.recv() => true,
        result = client.execute(request) => {
            let metrics = match result {
                Ok(response) => Metrics::new(start, response.status().as_u16(), false),
                Err(err) if err.is_timeout() => {
                    debug!("Request timed out: {}", err);
                    Metrics::new(start, 0, true)
                }
                Err(err) => {
                    debug!("Request failed: {}", err);
                    Metrics::new(start, 0, false)
                }
            };
            metrics_tx.send(metrics).await.is_err()
        }
    }
}
