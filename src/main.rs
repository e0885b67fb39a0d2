use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use districter::config::RunConfig;
use districter::csv_reader::{read_distance_csv, read_population_csv};
use districter::error::DistrictError;
use districter::export::write_assignments_csv;
use districter::model::Bounds;
use districter::optimize::{DEFAULT_THRESHOLD, Params, SolveOptions, solve_districting};
use districter::solver::HighsBackend;

/// Assign population units to district centers with the Hess model.
#[derive(Debug, Parser)]
#[command(name = "districter", version, about)]
struct Cli {
    /// TOML run configuration; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distance matrix CSV (header row, one numeric column per unit)
    #[arg(long)]
    distances: Option<PathBuf>,

    /// Population CSV (header row, unit label then population)
    #[arg(long)]
    population: Option<PathBuf>,

    /// Lower population bound per district
    #[arg(long)]
    lower: Option<f64>,

    /// Upper population bound per district
    #[arg(long)]
    upper: Option<f64>,

    /// Number of districts
    #[arg(long)]
    districts: Option<usize>,

    /// Wall-clock solver time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Write the unit,district table to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Binary rounding threshold for solved variables
    #[arg(long)]
    threshold: Option<f64>,
}

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let cli = Cli::parse();
    let config = resolve_config(cli)?;
    run(config)
}

/// Merges the optional TOML configuration with command-line overrides.
fn resolve_config(cli: Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_toml_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => RunConfig {
            distance_csv: require(cli.distances.clone(), "--distances")?,
            population_csv: require(cli.population.clone(), "--population")?,
            lower_bound: require(cli.lower, "--lower")?,
            upper_bound: require(cli.upper, "--upper")?,
            districts: require(cli.districts, "--districts")?,
            time_limit_secs: None,
            output_csv: None,
            solution_threshold: DEFAULT_THRESHOLD,
        },
    };

    if let Some(path) = cli.distances {
        config.distance_csv = path;
    }
    if let Some(path) = cli.population {
        config.population_csv = path;
    }
    if let Some(lower) = cli.lower {
        config.lower_bound = lower;
    }
    if let Some(upper) = cli.upper {
        config.upper_bound = upper;
    }
    if let Some(districts) = cli.districts {
        config.districts = districts;
    }
    if let Some(limit) = cli.time_limit {
        config.time_limit_secs = Some(limit);
    }
    if let Some(path) = cli.output {
        config.output_csv = Some(path);
    }
    if let Some(threshold) = cli.threshold {
        config.solution_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

fn require<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| anyhow::anyhow!("{flag} is required when no --config file is given"))
}

fn run(config: RunConfig) -> Result<()> {
    info!(
        "reading distance matrix from {}",
        config.distance_csv.display()
    );
    let distance = read_distance_csv(&config.distance_csv)
        .with_context(|| format!("failed to read {}", config.distance_csv.display()))?;

    info!(
        "reading population vector from {}",
        config.population_csv.display()
    );
    let population = read_population_csv(&config.population_csv)
        .with_context(|| format!("failed to read {}", config.population_csv.display()))?;

    info!(
        "{} units, {} districts, population window [{}, {}]",
        population.len(),
        config.districts,
        config.lower_bound,
        config.upper_bound
    );

    let params = Params {
        bounds: Bounds {
            lower: config.lower_bound,
            upper: config.upper_bound,
        },
        districts: config.districts,
    };
    let options = SolveOptions {
        time_limit: config.time_limit_secs.map(Duration::from_secs_f64),
        threshold: config.solution_threshold,
    };

    let plan = match solve_districting(&distance, &population, params, &HighsBackend, &options) {
        Ok(plan) => plan,
        Err(DistrictError::SolverAbnormal(status)) => {
            bail!("no districting exists under these parameters: solver status `{status}`")
        }
        Err(e) => return Err(e.into()),
    };

    let totals = plan.population_totals(&population);
    for (center, total) in &totals {
        info!(
            "district centered at unit {center}: {} members, population {total}",
            plan.members(*center).len()
        );
    }
    for a in plan.assignments() {
        println!("assign {} to {}", a.unit, a.center);
    }

    if let Some(path) = &config.output_csv {
        write_assignments_csv(&plan, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("assignments written to {}", path.display());
    }

    Ok(())
}
