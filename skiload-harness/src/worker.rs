use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skiload_common::{LiftRide, Parameters, Result, SkiersApi};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::clock::RunClock;
use crate::latch::CountdownLatch;
use crate::phase::{PhasePlan, SkierRange};
use crate::sample::{LatencySample, RequestClass};
use crate::stats::StatisticsAggregator;

/// Success and failure tallies shared by every worker of a run.
#[derive(Debug, Default)]
pub struct RunCounters {
    success: AtomicU64,
    failure: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, success: bool) {
        if success {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failure.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_failures(&self, count: u64) {
        self.failure.fetch_add(count, Ordering::Relaxed);
    }

    pub fn counts(&self) -> RunCounts {
        RunCounts {
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`RunCounters`] taken after the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub success: u64,
    pub failure: u64,
}

impl RunCounts {
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }
}

/// Everything one worker needs to know about its share of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub phase: u32,
    pub index: u32,
    pub skier_range: SkierRange,
    pub start_minute: u32,
    pub end_minute: u32,
    pub lift_count: u32,
    pub resort_id: String,
    pub day: u32,
    pub writes: u32,
    pub reads: u32,
}

impl WorkerConfig {
    pub fn for_phase(params: &Parameters, plan: &PhasePlan, index: u32, skier_range: SkierRange) -> Self {
        Self {
            phase: plan.spec.ordinal,
            index,
            skier_range,
            start_minute: plan.spec.start_minute,
            end_minute: plan.spec.end_minute,
            lift_count: params.lift_count,
            resort_id: params.resort_id.clone(),
            day: params.day_number,
            writes: plan.spec.writes_per_worker,
            reads: plan.spec.reads_per_worker,
        }
    }

    pub fn request_count(&self) -> u64 {
        self.writes as u64 + self.reads as u64
    }
}

/// State shared by all workers of a run.
pub struct WorkerContext {
    pub api: Arc<dyn SkiersApi>,
    pub counters: Arc<RunCounters>,
    /// `None` runs the counts-only variant: no latency samples are kept.
    pub stats: Option<Arc<StatisticsAggregator>>,
    pub clock: RunClock,
}

/// Draw a ride with a uniform skier in the worker's range, lift in
/// `[1, lift_count]` and minute in the phase window.
pub fn draw_ride(config: &WorkerConfig, rng: &mut impl Rng) -> LiftRide {
    let skier_id = config.skier_range.sample(rng);
    let lift_id = rng.gen_range(1..=config.lift_count.max(1));
    let time = rng.gen_range(config.start_minute..=config.end_minute.max(config.start_minute));
    LiftRide::new(&config.resort_id, config.day, skier_id, lift_id, time)
}

/// Signals the phase gate and the global barrier exactly once, when dropped.
///
/// Dropping with requests still outstanding (the worker panicked) counts them
/// as failures so the run's totals still add up.
struct CompletionGuard {
    gate: Arc<CountdownLatch>,
    global: Arc<CountdownLatch>,
    counters: Arc<RunCounters>,
    phase: u32,
    index: u32,
    remaining: u64,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.remaining > 0 {
            error!(
                phase = self.phase,
                worker = self.index,
                unissued = self.remaining,
                "worker aborted, counting unissued requests as failures"
            );
            self.counters.record_failures(self.remaining);
        }
        self.gate.count_down();
        self.global.count_down();
    }
}

/// Issue the worker's writes, then its reads, then signal completion.
pub async fn run_worker(
    config: WorkerConfig,
    ctx: Arc<WorkerContext>,
    gate: Arc<CountdownLatch>,
    global: Arc<CountdownLatch>,
) {
    let mut guard = CompletionGuard {
        gate,
        global,
        counters: ctx.counters.clone(),
        phase: config.phase,
        index: config.index,
        remaining: config.request_count(),
    };
    let mut rng = StdRng::from_entropy();

    for _ in 0..config.writes {
        let ride = draw_ride(&config, &mut rng);
        let start_ms = ctx.clock.now_ms();
        let result = ctx.api.submit_ride(&ride).await;
        let end_ms = ctx.clock.now_ms();
        settle(&ctx, &config, RequestClass::Write, result, start_ms, end_ms);
        guard.remaining -= 1;
    }

    for _ in 0..config.reads {
        let skier_id = config.skier_range.sample(&mut rng);
        let start_ms = ctx.clock.now_ms();
        let result = ctx.api.query_vertical(&config.resort_id, config.day, skier_id).await;
        let end_ms = ctx.clock.now_ms();
        settle(&ctx, &config, RequestClass::Read, result, start_ms, end_ms);
        guard.remaining -= 1;
    }

    debug!(phase = config.phase, worker = config.index, "worker finished");
}

/// Count one request's outcome and, when tracking statistics, keep its sample.
pub fn settle(
    ctx: &WorkerContext,
    config: &WorkerConfig,
    class: RequestClass,
    result: Result<u16>,
    start_ms: u64,
    end_ms: u64,
) {
    let status = match result {
        Ok(status) => status,
        Err(e) => {
            ctx.counters.record(false);
            warn!(phase = config.phase, worker = config.index, ?class, error = %e, "request failed");
            return;
        }
    };

    ctx.counters.record(status == class.success_code());

    let Some(stats) = &ctx.stats else {
        return;
    };
    match LatencySample::new(class, status, start_ms, end_ms) {
        Ok(sample) => stats.record(sample),
        Err(e) => error!(phase = config.phase, worker = config.index, error = %e, "discarding sample"),
    }
}
