use skiload_common::{Result, SkiLoadError, READ_SUCCESS_CODE, WRITE_SUCCESS_CODE};

/// The two kinds of request a worker issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Lift-ride write (`POST`).
    Write,
    /// Skier vertical query (`GET`).
    Read,
}

impl RequestClass {
    /// The only status code counted as a success for this class.
    pub fn success_code(self) -> u16 {
        match self {
            RequestClass::Write => WRITE_SUCCESS_CODE,
            RequestClass::Read => READ_SUCCESS_CODE,
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            RequestClass::Write => "POST",
            RequestClass::Read => "GET",
        }
    }
}

/// Timing and outcome of one request that received a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySample {
    class: RequestClass,
    status: u16,
    start_ms: u64,
    end_ms: u64,
}

impl LatencySample {
    /// Fails with [`SkiLoadError::NegativeLatency`] when `end_ms < start_ms`.
    pub fn new(class: RequestClass, status: u16, start_ms: u64, end_ms: u64) -> Result<Self> {
        if end_ms < start_ms {
            return Err(SkiLoadError::NegativeLatency { start_ms, end_ms });
        }
        Ok(Self { class, status, start_ms, end_ms })
    }

    pub fn class(&self) -> RequestClass {
        self.class
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn latency_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}
