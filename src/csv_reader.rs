use crate::error::{DistrictError, Result};

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Reads a travel-cost matrix from a CSV file.
///
/// The first row is a header and is skipped; every data row must carry one
/// numeric cell per column. Squareness is not checked here, the model
/// builder validates it against the population vector.
///
/// # Errors
/// Returns an error if the file cannot be read, a row is ragged, or a cell
/// is not numeric.
pub fn read_distance_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path)?;
    read_distance_from_reader(file)
}

/// Reads the distance matrix from any `Read` source.
pub fn read_distance_from_reader<R: Read>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut matrix = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2; // CSV rows are 1-indexed, +1 for header

        if is_blank(&rec) {
            continue;
        }

        let mut parsed = Vec::with_capacity(rec.len());
        for (j, field) in rec.iter().enumerate() {
            parsed.push(parse_float(field, row, j + 1)?);
        }
        matrix.push(parsed);
    }

    Ok(matrix)
}

/// Reads a population vector from a CSV file.
///
/// The first row is a header and is skipped. Each data row carries the unit
/// label in the first column and its population in the second; extra
/// columns are ignored.
///
/// # Errors
/// Returns an error if the file cannot be read, a row has fewer than 2
/// columns, or the population cell is not numeric.
pub fn read_population_csv<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)?;
    read_population_from_reader(file)
}

/// Reads the population vector from any `Read` source.
pub fn read_population_from_reader<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true) // allow additional columns
        .from_reader(reader);

    let mut population = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2;

        if is_blank(&rec) {
            continue;
        }

        let field = rec.get(1).ok_or(DistrictError::CsvRow {
            row,
            expected: 2,
            got: rec.len(),
        })?;
        population.push(parse_float(field, row, 2)?);
    }

    Ok(population)
}

fn is_blank(rec: &StringRecord) -> bool {
    rec.iter().all(|f| f.trim().is_empty())
}

fn parse_float(value: &str, row: usize, col: usize) -> Result<f64> {
    value.parse().map_err(|source| DistrictError::CsvCell {
        row,
        col,
        value: value.to_string(),
        source,
    })
}
