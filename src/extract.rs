use std::collections::BTreeMap;

use crate::error::{DistrictError, Result};

/// One unit's assignment to its district center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub unit: usize,
    pub center: usize,
}

/// Solved unit -> center mapping, ordered by unit index ascending.
///
/// The ordering is a contract: the result sink writes one row per pair in
/// this order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictPlan {
    assignments: Vec<Assignment>,
    objective: Option<f64>,
}

impl DistrictPlan {
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments,
            objective: None,
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Optimal objective value, when the backend reported one.
    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    pub(crate) fn set_objective(&mut self, objective: f64) {
        self.objective = Some(objective);
    }

    /// Active centers (self-assigned units), sorted ascending.
    pub fn centers(&self) -> Vec<usize> {
        let mut centers: Vec<usize> = self
            .assignments
            .iter()
            .filter(|a| a.unit == a.center)
            .map(|a| a.center)
            .collect();
        centers.sort_unstable();
        centers
    }

    /// Units assigned to the given center, in unit order.
    pub fn members(&self, center: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .filter(|a| a.center == center)
            .map(|a| a.unit)
            .collect()
    }

    /// Total assigned population per center.
    pub fn population_totals(&self, population: &[f64]) -> BTreeMap<usize, f64> {
        let mut totals = BTreeMap::new();
        for a in &self.assignments {
            *totals.entry(a.center).or_insert(0.0) += population[a.unit];
        }
        totals
    }
}

/// Decodes the solved variable matrix into a unit -> center mapping.
///
/// `values` holds the realized `Z` values in flattened `unit * n + center`
/// order. Entries at or above `threshold` count as assigned; the
/// conventional threshold of 0.5 tolerates solver numerical slack around
/// the binary values.
///
/// # Errors
/// Every unit must match exactly one center; zero or multiple matches is a
/// decode error, never a silently truncated list.
pub fn extract_assignments(values: &[f64], n: usize, threshold: f64) -> Result<DistrictPlan> {
    if values.len() != n * n {
        return Err(DistrictError::SolverError(format!(
            "expected {} variable values, got {}",
            n * n,
            values.len()
        )));
    }

    let mut assignments = Vec::with_capacity(n);
    for unit in 0..n {
        let row = &values[unit * n..(unit + 1) * n];
        let mut matched = row
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= threshold)
            .map(|(center, _)| center);

        let center = matched.next();
        let extra = matched.count();
        match (center, extra) {
            (Some(center), 0) => assignments.push(Assignment { unit, center }),
            (Some(_), extra) => {
                return Err(DistrictError::AssignmentDecode {
                    unit,
                    got: extra + 1,
                });
            }
            (None, _) => return Err(DistrictError::AssignmentDecode { unit, got: 0 }),
        }
    }

    Ok(DistrictPlan::from_assignments(assignments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_orders_by_unit() {
        // 3 units all assigned to center 1, with solver slack on the values.
        let values = vec![
            0.0, 0.9999, 0.0, //
            0.0001, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ];
        let plan = extract_assignments(&values, 3, 0.5).unwrap();
        let pairs: Vec<(usize, usize)> = plan
            .assignments()
            .iter()
            .map(|a| (a.unit, a.center))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(plan.centers(), vec![1]);
        assert_eq!(plan.members(1), vec![0, 1, 2]);
    }

    #[test]
    fn test_extract_rejects_unassigned_unit() {
        let values = vec![
            1.0, 0.0, //
            0.2, 0.3,
        ];
        let err = extract_assignments(&values, 2, 0.5).unwrap_err();
        assert!(matches!(
            err,
            DistrictError::AssignmentDecode { unit: 1, got: 0 }
        ));
    }

    #[test]
    fn test_extract_rejects_double_assignment() {
        let values = vec![
            1.0, 1.0, //
            0.0, 1.0,
        ];
        let err = extract_assignments(&values, 2, 0.5).unwrap_err();
        assert!(matches!(
            err,
            DistrictError::AssignmentDecode { unit: 0, got: 2 }
        ));
    }

    #[test]
    fn test_extract_rejects_wrong_value_count() {
        let err = extract_assignments(&[1.0, 0.0, 0.0], 2, 0.5).unwrap_err();
        assert!(matches!(err, DistrictError::SolverError(_)));
    }

    #[test]
    fn test_population_totals() {
        let plan = DistrictPlan::from_assignments(vec![
            Assignment { unit: 0, center: 1 },
            Assignment { unit: 1, center: 1 },
            Assignment { unit: 2, center: 2 },
        ]);
        let totals = plan.population_totals(&[10.0, 20.0, 30.0]);
        assert_eq!(totals.get(&1), Some(&30.0));
        assert_eq!(totals.get(&2), Some(&30.0));
    }

    #[test]
    fn test_empty_model_extracts_empty_plan() {
        let plan = extract_assignments(&[], 0, 0.5).unwrap();
        assert!(plan.is_empty());
    }
}
