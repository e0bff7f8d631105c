use hdrhistogram::Histogram;
use tracing::debug;

use crate::error::MetricsError;

#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| MetricsError::HistogramCreate { source: err })?;
        Ok(Self { hist })
    }

    /// Record a latency value in milliseconds. Sub-millisecond samples round
    /// up so the histogram never sees 0.
    pub fn record(&mut self, latency_ms: u64) {
        let value = latency_ms.max(1);
        if self.hist.record(value).is_err() {
            debug!("Latency sample {}ms exceeded histogram range.", value);
        }
    }

    /// P50/P90/P99 of the recorded values, zeroes when empty.
    #[must_use]
    pub fn percentiles(&self) -> (u64, u64, u64) {
        if self.count() == 0 {
            return (0, 0, 0);
        }

        (
            self.hist.value_at_quantile(0.5),
            self.hist.value_at_quantile(0.9),
            self.hist.value_at_quantile(0.99),
        )
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        if self.count() == 0 {
            return 0;
        }
        self.hist.min()
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        if self.count() == 0 {
            return 0;
        }
        self.hist.max()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
