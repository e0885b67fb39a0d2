use thiserror::Error;

use crate::solver::SolverStatus;

pub type Result<T> = std::result::Result<T, DistrictError>;

#[derive(Debug, Error)]
pub enum DistrictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV row {row}: expected at least {expected} columns, got {got}")]
    CsvRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid numeric value at row {row}, column {col}: {value}")]
    CsvCell {
        row: usize,
        col: usize,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Distance matrix side {side} does not match population length {population}")]
    ShapeMismatch { side: usize, population: usize },

    #[error("Distance matrix row {row} has {got} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid population bounds: lower {lower} exceeds upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("District count {districts} exceeds number of units {units}")]
    TooManyDistricts { districts: usize, units: usize },

    #[error("Invalid population for unit {unit}: {value}")]
    InvalidPopulation { unit: usize, value: f64 },

    #[error("Invalid distance from unit {from} to unit {to}: {value}")]
    InvalidDistance { from: usize, to: usize, value: f64 },

    #[error("Solver terminated without an optimal solution: {0}")]
    SolverAbnormal(SolverStatus),

    #[error("Optimization solver error: {0}")]
    SolverError(String),

    #[error("Solved assignment for unit {unit} matched {got} centers, expected exactly 1")]
    AssignmentDecode { unit: usize, got: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for DistrictError {
    fn from(err: toml::de::Error) -> Self {
        DistrictError::Config(format!("TOML parse error: {}", err))
    }
}
