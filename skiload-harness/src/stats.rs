use skiload_common::{Result, SkiLoadError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::sample::{LatencySample, RequestClass};

/// Collects latency samples from any number of concurrent workers.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    writes: Mutex<Vec<LatencySample>>,
    reads: Mutex<Vec<LatencySample>>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, sample: LatencySample) {
        self.samples(sample.class()).push(sample);
    }

    pub fn len(&self, class: RequestClass) -> usize {
        self.samples(class).len()
    }

    /// Copy both sample sets, each in insertion order.
    pub fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot {
            writes: self.samples(RequestClass::Write).clone(),
            reads: self.samples(RequestClass::Read).clone(),
        }
    }

    // A panicking worker cannot leave a half-pushed Vec behind, so a poisoned
    // lock still guards consistent data.
    fn samples(&self, class: RequestClass) -> MutexGuard<'_, Vec<LatencySample>> {
        let lock = match class {
            RequestClass::Write => &self.writes,
            RequestClass::Read => &self.reads,
        };
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Frozen copy of the samples of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSnapshot {
    pub writes: Vec<LatencySample>,
    pub reads: Vec<LatencySample>,
}

impl SampleSnapshot {
    pub fn len(&self) -> usize {
        self.writes.len() + self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate both classes. A class without samples has no statistics.
    pub fn statistics(&self) -> RunStatistics {
        RunStatistics {
            write: aggregate_class(RequestClass::Write, &self.writes),
            read: aggregate_class(RequestClass::Read, &self.reads),
        }
    }
}

fn aggregate_class(class: RequestClass, samples: &[LatencySample]) -> Option<AggregateStatistics> {
    match aggregate(samples) {
        Ok(stats) => Some(stats),
        Err(e) => {
            debug!(?class, error = %e, "no statistics for request class");
            None
        }
    }
}

/// Latency statistics of one request class, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p99: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStatistics {
    pub write: Option<AggregateStatistics>,
    pub read: Option<AggregateStatistics>,
}

/// Compute mean, median, p99 and max over `samples`.
///
/// Even-sized sets report the average of the two central elements as the
/// median. An empty set is an error rather than a row of zeros.
pub fn aggregate(samples: &[LatencySample]) -> Result<AggregateStatistics> {
    if samples.is_empty() {
        return Err(SkiLoadError::EmptySampleSet);
    }

    let mut latencies: Vec<u64> = samples.iter().map(LatencySample::latency_ms).collect();
    latencies.sort();
    let n = latencies.len();

    let median = if n % 2 == 1 {
        latencies[n / 2] as f64
    } else {
        (latencies[n / 2 - 1] as f64 + latencies[n / 2] as f64) / 2.0
    };
    let mean = latencies.iter().map(|&l| l as f64).sum::<f64>() / n as f64;

    Ok(AggregateStatistics {
        count: n,
        mean,
        median,
        p99: latencies[p99_index(n)],
        max: latencies[n - 1],
    })
}

/// `ceil(0.99 * n) - 1`, computed in integers. Valid for every `n >= 1`.
pub fn p99_index(n: usize) -> usize {
    (99 * n).div_ceil(100).saturating_sub(1)
}
