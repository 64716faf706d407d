use anyhow::Result;
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Distribution statistics for one method's timed reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub std_dev_ms: f64,
    pub percentiles: Vec<PercentileValue>,
    pub total_samples: usize,
}

/// Percentile value pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value_ms: f64,
}

/// Timing collector for a single method.
///
/// Raw samples are kept in order so the reported mean is the exact arithmetic
/// average; the HDR histogram (nanoseconds, 3 significant figures) supplies
/// the distribution figures.
pub struct TimingCollector {
    histogram: Histogram<u64>,
    samples_ms: Vec<f64>,
}

impl TimingCollector {
    pub fn new() -> Result<Self> {
        let histogram = Histogram::<u64>::new(3)?;
        Ok(Self {
            histogram,
            samples_ms: Vec::new(),
        })
    }

    /// Record one iteration's elapsed time.
    pub fn record(&mut self, elapsed: Duration) -> Result<()> {
        // Sub-nanosecond reads still count as one sample.
        let nanos = (elapsed.as_nanos() as u64).max(1);
        self.histogram.record(nanos)?;
        self.samples_ms.push(elapsed.as_secs_f64() * 1_000.0);
        Ok(())
    }

    /// Arithmetic mean of the raw samples, 0 when nothing was recorded
    pub fn mean_ms(&self) -> f64 {
        if self.samples_ms.is_empty() {
            return 0.0;
        }
        self.samples_ms.iter().sum::<f64>() / self.samples_ms.len() as f64
    }

    pub fn stats(&self, percentiles: &[f64]) -> TimingStats {
        let (_, min_ms, max_ms, std_dev_ms) = crate::utils::calculate_stats(&self.samples_ms);

        let percentiles = percentiles
            .iter()
            .map(|&p| PercentileValue {
                percentile: p,
                value_ms: ns_to_ms(self.histogram.value_at_percentile(p)),
            })
            .collect();

        TimingStats {
            min_ms,
            max_ms,
            median_ms: ns_to_ms(self.histogram.value_at_percentile(50.0)),
            std_dev_ms,
            percentiles,
            total_samples: self.samples_ms.len(),
        }
    }

    /// Consume the collector, returning the raw samples in recording order.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples_ms
    }
}

fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1_000_000.0
}
