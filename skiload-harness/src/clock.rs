use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Millisecond clock shared by every worker of a run.
///
/// Readings are monotonic (driven by `Instant`) but anchored to the Unix epoch
/// at the moment the clock was started, so CSV timestamps stay recognisable.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    origin: Instant,
    origin_unix_ms: u64,
}

impl RunClock {
    pub fn start() -> Self {
        let origin_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self { origin: Instant::now(), origin_unix_ms }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin_unix_ms + self.origin.elapsed().as_millis() as u64
    }
}
