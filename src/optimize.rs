use std::time::Duration;

use log::{debug, info};

use crate::error::{DistrictError, Result};
use crate::extract::{DistrictPlan, extract_assignments};
use crate::model::{Bounds, HessModel};
use crate::solver::{MilpBackend, SolverStatus};

/// Conventional binary-rounding threshold for solved variables.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Scalar parameters of a districting run.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub bounds: Bounds,
    pub districts: usize,
}

/// Per-run solve settings.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Wall-clock limit handed to the backend. A limit termination is
    /// reported as its own status, not as infeasibility.
    pub time_limit: Option<Duration>,
    /// Rounding threshold used when decoding the solved variables.
    pub threshold: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Builds the Hess model, runs the backend once, and decodes the result.
///
/// One-shot and stateless: the model lives only for this call, and nothing
/// is retried. Relaxing bounds after an infeasible outcome is a caller
/// policy, not done here.
///
/// # Errors
/// Input validation failures surface before any model state exists. A
/// backend terminating without an optimum is reported as
/// [`DistrictError::SolverAbnormal`], never as a partial assignment list.
pub fn solve_districting(
    distance: &[Vec<f64>],
    population: &[f64],
    params: Params,
    backend: &impl MilpBackend,
    options: &SolveOptions,
) -> Result<DistrictPlan> {
    let model = HessModel::build(distance, population, params.bounds, params.districts)?;
    info!(
        "built Hess model: {} units, {} districts, {} variables, {} rows",
        model.num_units(),
        model.num_districts(),
        model.num_vars(),
        model.num_rows()
    );

    let outcome = backend.optimize(&model, options.time_limit)?;
    debug!("solver terminated: {}", outcome.status);

    if outcome.status != SolverStatus::Optimal {
        return Err(DistrictError::SolverAbnormal(outcome.status));
    }
    let values = outcome.values.ok_or_else(|| {
        DistrictError::SolverError("backend reported optimal without variable values".to_string())
    })?;

    let mut plan = extract_assignments(&values, model.num_units(), options.threshold)?;
    if let Some(objective) = outcome.objective {
        info!("optimal objective: {objective:.3}");
        plan.set_objective(objective);
    }
    Ok(plan)
}
