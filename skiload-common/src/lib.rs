use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Status code the API answers a successful lift-ride write with.
pub const WRITE_SUCCESS_CODE: u16 = 201;
/// Status code the API answers a successful vertical query with.
pub const READ_SUCCESS_CODE: u16 = 200;

/// Error types for SkiLoad operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkiLoadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Negative latency: request ended at {end_ms} ms before it started at {start_ms} ms")]
    NegativeLatency { start_ms: u64, end_ms: u64 },

    #[error("Cannot aggregate an empty sample set")]
    EmptySampleSet,

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SkiLoadError {
    fn from(e: std::io::Error) -> Self {
        SkiLoadError::Io(e.to_string())
    }
}

/// Result type for SkiLoad operations
pub type Result<T> = std::result::Result<T, SkiLoadError>;

/// Run parameters, read once before any traffic is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub max_concurrency: u32,
    pub population_size: u32,
    pub lift_count: u32,
    pub resort_id: String,
    /// Base URL of the API, e.g. `http://localhost:8080/api`.
    pub server_address: String,
    pub day_number: u32,
}

impl Parameters {
    /// Read and validate parameters from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SkiLoadError::Config(format!("cannot read {}: {e}", path.display())))?;
        let params: Parameters = serde_json::from_str(&raw)
            .map_err(|e| SkiLoadError::Config(format!("cannot parse {}: {e}", path.display())))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter sets no run can be planned from.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(SkiLoadError::Config("max_concurrency must be greater than 0".into()));
        }
        if self.population_size == 0 {
            return Err(SkiLoadError::Config("population_size must be greater than 0".into()));
        }
        if self.lift_count == 0 {
            return Err(SkiLoadError::Config("lift_count must be greater than 0".into()));
        }
        if self.resort_id.trim().is_empty() {
            return Err(SkiLoadError::Config("resort_id must not be empty".into()));
        }
        if self.server_address.trim().is_empty() {
            return Err(SkiLoadError::Config("server_address must not be empty".into()));
        }
        Ok(())
    }
}

/// Body of a lift-ride write. The API expects every field as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftRide {
    #[serde(rename = "resortID")]
    pub resort_id: String,
    #[serde(rename = "dayID")]
    pub day_id: String,
    #[serde(rename = "skierID")]
    pub skier_id: String,
    pub time: String,
    #[serde(rename = "liftID")]
    pub lift_id: String,
}

impl LiftRide {
    pub fn new(resort_id: &str, day: u32, skier_id: u32, lift_id: u32, time: u32) -> Self {
        Self {
            resort_id: resort_id.to_string(),
            day_id: day.to_string(),
            skier_id: skier_id.to_string(),
            time: time.to_string(),
            lift_id: lift_id.to_string(),
        }
    }
}

/// The two remote operations a load-test worker drives.
///
/// Implementations return `Ok(status)` for every HTTP response, whatever its
/// code, and `Err` only when no response was obtained.
#[async_trait]
pub trait SkiersApi: Send + Sync {
    async fn submit_ride(&self, ride: &LiftRide) -> Result<u16>;

    async fn query_vertical(&self, resort_id: &str, day: u32, skier_id: u32) -> Result<u16>;
}
