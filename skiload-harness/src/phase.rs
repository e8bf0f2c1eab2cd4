use rand::Rng;
use skiload_common::Parameters;
use std::ops::RangeInclusive;

/// Phases 1 and 3 run `max_concurrency / QUARTER_DIVISOR` workers; the same
/// divisor fixes the skier-ID slice width of every worker.
pub const QUARTER_DIVISOR: u32 = 4;

/// A non-final phase releases the next one after `ceil(workers / GATE_DIVISOR)`
/// of its workers have finished.
pub const GATE_DIVISOR: u32 = 10;

/// How many workers a phase runs, relative to `max_concurrency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseWorkers {
    Quarter,
    Full,
}

impl PhaseWorkers {
    pub fn count(self, max_concurrency: u32) -> u32 {
        match self {
            PhaseWorkers::Quarter => max_concurrency / QUARTER_DIVISOR,
            PhaseWorkers::Full => max_concurrency,
        }
    }
}

/// Static description of one phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpec {
    pub ordinal: u32,
    /// First minute of the day (1-based, inclusive) ride times are drawn from.
    pub start_minute: u32,
    /// Last minute of the day (inclusive).
    pub end_minute: u32,
    pub writes_per_worker: u32,
    pub reads_per_worker: u32,
    pub workers: PhaseWorkers,
}

impl PhaseSpec {
    pub fn time_window(&self) -> RangeInclusive<u32> {
        self.start_minute..=self.end_minute
    }
}

/// The three phases of a standard run.
///
/// | Phase | Minutes   | Writes | Reads | Workers |
/// |-------|-----------|--------|-------|---------|
/// | 1     | 1..=90    | 100    | 5     | max/4   |
/// | 2     | 91..=360  | 100    | 5     | max     |
/// | 3     | 361..=420 | 100    | 10    | max/4   |
pub const PHASES: [PhaseSpec; 3] = [
    PhaseSpec {
        ordinal: 1,
        start_minute: 1,
        end_minute: 90,
        writes_per_worker: 100,
        reads_per_worker: 5,
        workers: PhaseWorkers::Quarter,
    },
    PhaseSpec {
        ordinal: 2,
        start_minute: 91,
        end_minute: 360,
        writes_per_worker: 100,
        reads_per_worker: 5,
        workers: PhaseWorkers::Full,
    },
    PhaseSpec {
        ordinal: 3,
        start_minute: 361,
        end_minute: 420,
        writes_per_worker: 100,
        reads_per_worker: 10,
        workers: PhaseWorkers::Quarter,
    },
];

/// Inclusive range of skier IDs owned by one worker.
///
/// Integer truncation can produce an empty range (`end < start`); such a
/// range always yields its `start` ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkierRange {
    pub start: u32,
    pub end: u32,
}

impl SkierRange {
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        if self.is_empty() {
            self.start
        } else {
            rng.gen_range(self.start..=self.end)
        }
    }
}

/// Width of every worker's skier-ID slice: `population / max_concurrency / 4`.
///
/// The width does not depend on the phase, so a phase with more workers
/// covers a wider span of the population.
pub fn slice_width(params: &Parameters) -> u32 {
    params.population_size / params.max_concurrency / QUARTER_DIVISOR
}

/// Worker `i` owns `[i * width + 1, (i + 1) * width]`.
pub fn partition(width: u32, worker_count: u32) -> Vec<SkierRange> {
    (0..worker_count)
        .map(|i| SkierRange {
            start: i * width + 1,
            end: (i + 1) * width,
        })
        .collect()
}

/// A phase sized for a concrete parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    pub spec: PhaseSpec,
    pub worker_count: u32,
    /// Number of finished workers the controller waits for before starting
    /// the next phase. Zero for the final phase.
    pub gate: u32,
    pub ranges: Vec<SkierRange>,
}

impl PhasePlan {
    pub fn request_count(&self) -> u64 {
        self.worker_count as u64
            * (self.spec.writes_per_worker as u64 + self.spec.reads_per_worker as u64)
    }
}

pub fn plan_phases(params: &Parameters, specs: &[PhaseSpec]) -> Vec<PhasePlan> {
    let width = slice_width(params);
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let worker_count = spec.workers.count(params.max_concurrency);
            let gate = if i + 1 == specs.len() {
                0
            } else {
                worker_count.div_ceil(GATE_DIVISOR)
            };
            PhasePlan {
                spec: *spec,
                worker_count,
                gate,
                ranges: partition(width, worker_count),
            }
        })
        .collect()
}

/// Count for the global barrier: every worker of every phase.
pub fn total_workers(plans: &[PhasePlan]) -> u32 {
    plans.iter().map(|p| p.worker_count).sum()
}

/// Requests the run will attempt, successful or not.
pub fn total_requests(plans: &[PhasePlan]) -> u64 {
    plans.iter().map(PhasePlan::request_count).sum()
}
