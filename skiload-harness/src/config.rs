use clap::Args;
use skiload_common::{Parameters, Result};
use std::path::Path;

/// Command-line overrides for individual run parameters.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    /// Largest number of concurrent workers (phase 2 size)
    #[arg(long)]
    pub max_concurrency: Option<u32>,

    /// Number of distinct skiers
    #[arg(long = "population")]
    pub population_size: Option<u32>,

    /// Number of lifts at the resort
    #[arg(long = "lifts")]
    pub lift_count: Option<u32>,

    /// Resort identifier
    #[arg(long = "resort")]
    pub resort_id: Option<String>,

    /// Base URL of the API
    #[arg(long = "server")]
    pub server_address: Option<String>,

    /// Ski day number
    #[arg(long = "day")]
    pub day_number: Option<u32>,
}

impl ParameterOverrides {
    pub fn apply(&self, params: &mut Parameters) {
        if let Some(v) = self.max_concurrency {
            params.max_concurrency = v;
        }
        if let Some(v) = self.population_size {
            params.population_size = v;
        }
        if let Some(v) = self.lift_count {
            params.lift_count = v;
        }
        if let Some(v) = &self.resort_id {
            params.resort_id = v.clone();
        }
        if let Some(v) = &self.server_address {
            params.server_address = v.clone();
        }
        if let Some(v) = self.day_number {
            params.day_number = v;
        }
    }
}

/// Read parameters from `path`, apply `overrides`, and validate the result.
pub fn load_parameters(path: &Path, overrides: &ParameterOverrides) -> Result<Parameters> {
    let mut params = Parameters::from_file(path)?;
    overrides.apply(&mut params);
    params.validate()?;
    Ok(params)
}
