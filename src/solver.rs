use std::fmt;
use std::time::Duration;

use highs::{Col, HighsModelStatus, RowProblem, Sense};
use log::debug;

use crate::error::Result;
use crate::model::HessModel;

/// Terminal outcome category of an optimization run.
///
/// A time-limit termination is distinct from infeasibility: the former says
/// nothing about whether a solution exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    TimeLimit,
    Other(String),
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Optimal => write!(f, "optimal"),
            SolverStatus::Infeasible => write!(f, "infeasible"),
            SolverStatus::Unbounded => write!(f, "unbounded"),
            SolverStatus::TimeLimit => write!(f, "time limit reached"),
            SolverStatus::Other(status) => write!(f, "{status}"),
        }
    }
}

/// What a backend reports after reaching a terminal status.
///
/// `values` holds the realized assignment variables in flattened
/// `unit * n + center` order and is present only when the status is
/// [`SolverStatus::Optimal`], as is `objective`.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    pub values: Option<Vec<f64>>,
    pub objective: Option<f64>,
}

/// Narrow mixed-integer solving contract consumed by the formulation layer.
///
/// A backend registers the model's binary variables, objective, and linear
/// rows, runs a blocking one-shot search, and reports a terminal status
/// plus variable values when an optimum was found. Callers never retry and
/// never inspect internal search state, so backends are swappable.
pub trait MilpBackend {
    fn optimize(&self, model: &HessModel, time_limit: Option<Duration>) -> Result<SolverOutcome>;
}

/// Production backend over the HiGHS solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsBackend;

impl MilpBackend for HighsBackend {
    fn optimize(&self, model: &HessModel, time_limit: Option<Duration>) -> Result<SolverOutcome> {
        let mut pb = RowProblem::new();

        let cols: Vec<Col> = model
            .objective()
            .iter()
            .map(|&cost| pb.add_integer_column(cost, 0.0..=1.0))
            .collect();

        for row in model.rows() {
            let terms: Vec<(Col, f64)> = row
                .terms
                .iter()
                .map(|&(var, coeff)| (cols[var], coeff))
                .collect();
            pb.add_row(row.lower..=row.upper, terms);
        }

        let mut solver = pb.optimise(Sense::Minimise);
        solver.set_option("output_flag", false);
        if let Some(limit) = time_limit {
            solver.set_option("time_limit", limit.as_secs_f64());
        }

        let solved = solver.solve();
        let status = map_status(solved.status());
        debug!("HiGHS terminated with status: {status}");

        if status != SolverStatus::Optimal {
            return Ok(SolverOutcome {
                status,
                values: None,
                objective: None,
            });
        }

        let solution = solved.get_solution();
        let values = cols.iter().map(|&c| solution[c]).collect();
        Ok(SolverOutcome {
            status,
            values: Some(values),
            objective: Some(solved.objective_value()),
        })
    }
}

fn map_status(status: HighsModelStatus) -> SolverStatus {
    match status {
        // An empty model (zero units) is trivially solved.
        HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => SolverStatus::Optimal,
        HighsModelStatus::Infeasible => SolverStatus::Infeasible,
        HighsModelStatus::Unbounded => SolverStatus::Unbounded,
        HighsModelStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        other => SolverStatus::Other(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bounds;

    #[test]
    fn test_single_unit_model_solves_to_identity() {
        let distance = vec![vec![0.0]];
        let population = vec![42.0];
        let model = HessModel::build(
            &distance,
            &population,
            Bounds {
                lower: 0.0,
                upper: 100.0,
            },
            1,
        )
        .unwrap();

        let outcome = HighsBackend.optimize(&model, None).unwrap();
        assert_eq!(outcome.status, SolverStatus::Optimal);
        let values = outcome.values.unwrap();
        assert_eq!(values.len(), 1);
        assert!(values[0] > 0.5);
        assert!(outcome.objective.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_infeasible_window_is_reported_not_truncated() {
        // A single unit of population 42 cannot land in [0, 10].
        let distance = vec![vec![0.0]];
        let population = vec![42.0];
        let model = HessModel::build(
            &distance,
            &population,
            Bounds {
                lower: 0.0,
                upper: 10.0,
            },
            1,
        )
        .unwrap();

        let outcome = HighsBackend.optimize(&model, None).unwrap();
        assert_eq!(outcome.status, SolverStatus::Infeasible);
        assert!(outcome.values.is_none());
        assert!(outcome.objective.is_none());
    }
}
