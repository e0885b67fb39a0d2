use crate::error::{DistrictError, Result};

/// Inclusive per-district population window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// Linear row `lower <= sum(coeff * var) <= upper` over the flattened
/// assignment variables.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub lower: f64,
    pub upper: f64,
    pub terms: Vec<(usize, f64)>,
}

impl Row {
    fn equality(rhs: f64, terms: Vec<(usize, f64)>) -> Self {
        Self {
            lower: rhs,
            upper: rhs,
            terms,
        }
    }

    fn at_most(upper: f64, terms: Vec<(usize, f64)>) -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper,
            terms,
        }
    }

    fn at_least(lower: f64, terms: Vec<(usize, f64)>) -> Self {
        Self {
            lower,
            upper: f64::INFINITY,
            terms,
        }
    }
}

/// Hess assignment model in backend-neutral form.
///
/// Binary variables `Z[i][j]` (unit `i` assigned to center `j`) are
/// flattened to `i * n + j`. The objective minimizes
/// `distance[i][j]^2 * population[i]` over the chosen assignments; the
/// squared distance penalizes long assignments super-linearly, which favors
/// compact districts.
///
/// Constraint families:
/// - each unit is assigned to exactly one center,
/// - exactly `districts` units are self-assigned (active centers),
/// - per-center population window `[lower, upper]`, scaled by `Z[j][j]` so
///   inactive centers satisfy it vacuously,
/// - `Z[i][j] <= Z[j][j]` for `i != j`: units may only join active centers.
///
/// The last family does not encode geographic adjacency; districts are not
/// guaranteed to be contiguous.
#[derive(Debug, Clone)]
pub struct HessModel {
    n: usize,
    districts: usize,
    objective: Vec<f64>,
    rows: Vec<Row>,
}

impl HessModel {
    /// Validates the inputs and builds the variable/objective/constraint
    /// set. No solving happens here.
    ///
    /// # Errors
    /// Fails fast, before any model state is created, when the distance
    /// matrix is not square or disagrees with the population length, when
    /// `bounds.lower > bounds.upper`, when `districts` exceeds the unit
    /// count, or when any population/distance is negative or non-finite.
    pub fn build(
        distance: &[Vec<f64>],
        population: &[f64],
        bounds: Bounds,
        districts: usize,
    ) -> Result<Self> {
        let n = population.len();

        if distance.len() != n {
            return Err(DistrictError::ShapeMismatch {
                side: distance.len(),
                population: n,
            });
        }
        for (i, row) in distance.iter().enumerate() {
            if row.len() != n {
                return Err(DistrictError::RaggedMatrix {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
        }
        if bounds.lower > bounds.upper {
            return Err(DistrictError::InvalidBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        if districts > n {
            return Err(DistrictError::TooManyDistricts {
                districts,
                units: n,
            });
        }
        for (i, &p) in population.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(DistrictError::InvalidPopulation { unit: i, value: p });
            }
        }
        for (i, row) in distance.iter().enumerate() {
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(DistrictError::InvalidDistance {
                        from: i,
                        to: j,
                        value: d,
                    });
                }
            }
        }

        // min sum_ij distance[i][j]^2 * population[i] * Z[i][j]
        let mut objective = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                objective[i * n + j] = distance[i][j] * distance[i][j] * population[i];
            }
        }

        let mut rows = Vec::with_capacity(n * n + 2 * n + 1);

        // sum_j Z[i][j] = 1 for every unit i
        for i in 0..n {
            let terms = (0..n).map(|j| (i * n + j, 1.0)).collect();
            rows.push(Row::equality(1.0, terms));
        }

        // sum_j Z[j][j] = districts
        let diagonal = (0..n).map(|j| (j * n + j, 1.0)).collect();
        rows.push(Row::equality(districts as f64, diagonal));

        // sum_i population[i] * Z[i][j] <= upper * Z[j][j]
        // sum_i population[i] * Z[i][j] >= lower * Z[j][j]
        for j in 0..n {
            let mut upper_terms = Vec::with_capacity(n);
            let mut lower_terms = Vec::with_capacity(n);
            for i in 0..n {
                if i == j {
                    upper_terms.push((j * n + j, population[j] - bounds.upper));
                    lower_terms.push((j * n + j, population[j] - bounds.lower));
                } else {
                    upper_terms.push((i * n + j, population[i]));
                    lower_terms.push((i * n + j, population[i]));
                }
            }
            rows.push(Row::at_most(0.0, upper_terms));
            rows.push(Row::at_least(0.0, lower_terms));
        }

        // Z[i][j] <= Z[j][j] for i != j
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    rows.push(Row::at_most(0.0, vec![(i * n + j, 1.0), (j * n + j, -1.0)]));
                }
            }
        }

        Ok(Self {
            n,
            districts,
            objective,
            rows,
        })
    }

    pub fn num_units(&self) -> usize {
        self.n
    }

    pub fn num_districts(&self) -> usize {
        self.districts
    }

    pub fn num_vars(&self) -> usize {
        self.n * self.n
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Flattened variable id of `Z[unit][center]`.
    pub fn var(&self, unit: usize, center: usize) -> usize {
        unit * self.n + center
    }

    pub(crate) fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetric_distance() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ]
    }

    fn bounds(lower: f64, upper: f64) -> Bounds {
        Bounds { lower, upper }
    }

    #[test]
    fn test_model_dimensions() {
        let population = vec![10.0, 20.0, 30.0];
        let model =
            HessModel::build(&symmetric_distance(), &population, bounds(0.0, 1000.0), 2).unwrap();

        let n = 3;
        assert_eq!(model.num_units(), n);
        assert_eq!(model.num_vars(), n * n);
        // n assignment rows + 1 count row + 2n bound rows + n(n-1) consistency rows
        assert_eq!(model.num_rows(), n * n + 2 * n + 1);
    }

    #[test]
    fn test_objective_squares_distance_and_weights_population() {
        let population = vec![10.0, 20.0, 30.0];
        let model =
            HessModel::build(&symmetric_distance(), &population, bounds(0.0, 1000.0), 1).unwrap();

        // Z[0][2]: distance 2.0 squared, weighted by population 10
        assert_eq!(model.objective()[model.var(0, 2)], 40.0);
        // Z[2][0]: distance 2.0 squared, weighted by population 30
        assert_eq!(model.objective()[model.var(2, 0)], 120.0);
        // diagonal entries cost nothing when distance is 0
        assert_eq!(model.objective()[model.var(1, 1)], 0.0);
    }

    #[test]
    fn test_population_window_scales_with_center_activity() {
        let population = vec![10.0, 20.0, 30.0];
        let model =
            HessModel::build(&symmetric_distance(), &population, bounds(25.0, 29.0), 2).unwrap();

        // Upper-bound row for center 0: p_i on off-diagonal terms, p_0 - U
        // on the diagonal, right-hand side 0.
        let row = &model.rows()[3 + 1]; // 3 assignment rows, 1 count row
        assert_eq!(row.upper, 0.0);
        assert!(row.lower.is_infinite() && row.lower < 0.0);
        let diag = row
            .terms
            .iter()
            .find(|(var, _)| *var == model.var(0, 0))
            .unwrap();
        assert_eq!(diag.1, 10.0 - 29.0);
    }

    #[test]
    fn test_rejects_non_square_matrix() {
        let distance = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let population = vec![10.0, 20.0, 30.0];
        let err =
            HessModel::build(&distance, &population, bounds(0.0, 100.0), 1).unwrap_err();
        assert!(matches!(
            err,
            DistrictError::ShapeMismatch { side: 2, population: 3 }
        ));
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let distance = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0],
            vec![2.0, 1.0, 0.0],
        ];
        let population = vec![10.0, 20.0, 30.0];
        let err =
            HessModel::build(&distance, &population, bounds(0.0, 100.0), 1).unwrap_err();
        assert!(matches!(err, DistrictError::RaggedMatrix { row: 1, got: 2, .. }));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let population = vec![10.0, 20.0, 30.0];
        let err = HessModel::build(&symmetric_distance(), &population, bounds(50.0, 10.0), 1)
            .unwrap_err();
        assert!(matches!(err, DistrictError::InvalidBounds { .. }));
    }

    #[test]
    fn test_rejects_more_districts_than_units() {
        let population = vec![10.0, 20.0, 30.0];
        let err = HessModel::build(&symmetric_distance(), &population, bounds(0.0, 100.0), 4)
            .unwrap_err();
        assert!(matches!(
            err,
            DistrictError::TooManyDistricts { districts: 4, units: 3 }
        ));
    }

    #[test]
    fn test_rejects_negative_population() {
        let population = vec![10.0, -5.0, 30.0];
        let err = HessModel::build(&symmetric_distance(), &population, bounds(0.0, 100.0), 1)
            .unwrap_err();
        assert!(matches!(err, DistrictError::InvalidPopulation { unit: 1, .. }));
    }

    #[test]
    fn test_rejects_non_finite_distance() {
        let mut distance = symmetric_distance();
        distance[0][2] = f64::NAN;
        let population = vec![10.0, 20.0, 30.0];
        let err = HessModel::build(&distance, &population, bounds(0.0, 100.0), 1).unwrap_err();
        assert!(matches!(
            err,
            DistrictError::InvalidDistance { from: 0, to: 2, .. }
        ));
    }
}
