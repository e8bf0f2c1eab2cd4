use skiload_common::{Parameters, Result, SkiersApi};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::clock::RunClock;
use crate::latch::CountdownLatch;
use crate::phase::{plan_phases, total_requests, total_workers, PhaseSpec, PHASES};
use crate::stats::{RunStatistics, SampleSnapshot, StatisticsAggregator};
use crate::worker::{run_worker, RunCounters, RunCounts, WorkerConfig, WorkerContext};

/// Knobs of a run that are not part of the run parameters.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Keep per-request latency samples. When off only counts are reported.
    pub track_statistics: bool,
    pub phases: Vec<PhaseSpec>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { track_statistics: true, phases: PHASES.to_vec() }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub counts: RunCounts,
    /// `None` when statistics tracking was off.
    pub statistics: Option<RunStatistics>,
    pub samples: Option<SampleSnapshot>,
    pub wall_time: Duration,
}

impl RunReport {
    pub fn throughput_rps(&self) -> f64 {
        let secs = self.wall_time.as_secs_f64();
        if secs > 0.0 {
            self.counts.total() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drive `api` through every phase and wait for all workers to finish.
///
/// Each phase spawns one task per worker and starts the next phase as soon as
/// its gate opens, so phases overlap. Statistics are computed only after the
/// global barrier, from a private snapshot.
pub async fn run_load_test(
    params: &Parameters,
    api: Arc<dyn SkiersApi>,
    options: &RunOptions,
) -> Result<RunReport> {
    params.validate()?;

    let plans = plan_phases(params, &options.phases);
    let global = Arc::new(CountdownLatch::new(total_workers(&plans) as usize));
    let stats = options.track_statistics.then(|| Arc::new(StatisticsAggregator::new()));
    let ctx = Arc::new(WorkerContext {
        api,
        counters: Arc::new(RunCounters::new()),
        stats: stats.clone(),
        clock: RunClock::start(),
    });

    info!(
        max_concurrency = params.max_concurrency,
        workers = total_workers(&plans),
        requests = total_requests(&plans),
        track_statistics = options.track_statistics,
        "load test starting"
    );
    let started = Instant::now();

    for plan in &plans {
        let gate = Arc::new(CountdownLatch::new(plan.gate as usize));
        info!(
            phase = plan.spec.ordinal,
            workers = plan.worker_count,
            gate = plan.gate,
            "phase starting"
        );

        for (index, range) in plan.ranges.iter().enumerate() {
            let config = WorkerConfig::for_phase(params, plan, index as u32, *range);
            tokio::spawn(run_worker(config, ctx.clone(), gate.clone(), global.clone()));
        }

        gate.wait().await;
    }

    global.wait().await;
    let wall_time = started.elapsed();

    let counts = ctx.counters.counts();
    info!(
        success = counts.success,
        failure = counts.failure,
        wall_time_ms = wall_time.as_millis() as u64,
        "load test finished"
    );

    let samples = stats.map(|s| s.snapshot());
    let statistics = samples.as_ref().map(SampleSnapshot::statistics);

    Ok(RunReport { counts, statistics, samples, wall_time })
}
