pub mod config;
pub mod csv_reader;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod optimize;
pub mod solver;

pub use config::RunConfig;
pub use csv_reader::{read_distance_csv, read_population_csv};
pub use error::{DistrictError, Result};
pub use export::write_assignments_csv;
pub use extract::{Assignment, DistrictPlan, extract_assignments};
pub use model::{Bounds, HessModel};
pub use optimize::{DEFAULT_THRESHOLD, Params, SolveOptions, solve_districting};
pub use solver::{HighsBackend, MilpBackend, SolverOutcome, SolverStatus};
