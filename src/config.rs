use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{DistrictError, Result};
use crate::optimize::DEFAULT_THRESHOLD;

/// One districting run, as described by a TOML file.
///
/// ```toml
/// distance_csv = "OK_distances.csv"
/// population_csv = "OK_population.csv"
/// lower_bound = 705254.0
/// upper_bound = 795286.0
/// districts = 5
/// time_limit_secs = 60.0        # optional
/// output_csv = "assignments.csv" # optional
/// solution_threshold = 0.5       # default
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    pub distance_csv: PathBuf,
    pub population_csv: PathBuf,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub districts: usize,

    #[serde(default)]
    pub time_limit_secs: Option<f64>,
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
    #[serde(default = "default_threshold")]
    pub solution_threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl RunConfig {
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parameter-level checks done before any file is read. Bound ordering
    /// and the district/unit relation are validated later by the model
    /// builder, which knows the unit count.
    pub fn validate(&self) -> Result<()> {
        if self.districts == 0 {
            return Err(DistrictError::Config(
                "districts must be a positive integer".to_string(),
            ));
        }
        if !(self.solution_threshold > 0.0 && self.solution_threshold <= 1.0) {
            return Err(DistrictError::Config(format!(
                "solution_threshold must lie in (0, 1], got {}",
                self.solution_threshold
            )));
        }
        if let Some(limit) = self.time_limit_secs
            && !(limit > 0.0)
        {
            return Err(DistrictError::Config(format!(
                "time_limit_secs must be positive, got {limit}"
            )));
        }
        Ok(())
    }
}
