use csv::WriterBuilder;
use std::{fs::File, io::BufWriter, io::Write, path::Path};

use crate::error::Result;
use crate::extract::DistrictPlan;

/// Writes the assignment list as a `unit,district` table.
///
/// One data row per pair, in the plan's unit-ascending order; indices are
/// written as-is with no transformation.
pub fn write_assignments_csv<P: AsRef<Path>>(plan: &DistrictPlan, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    write_assignments(plan, writer)
}

fn write_assignments<W: Write>(plan: &DistrictPlan, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    wtr.write_record(["unit", "district"])?;
    for a in plan.assignments() {
        wtr.write_record([a.unit.to_string(), a.center.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Assignment;
    use tempfile::TempDir;

    fn sample_plan() -> DistrictPlan {
        DistrictPlan::from_assignments(vec![
            Assignment { unit: 0, center: 1 },
            Assignment { unit: 1, center: 1 },
            Assignment { unit: 2, center: 2 },
        ])
    }

    #[test]
    fn test_csv_content_and_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("assignments.csv");

        write_assignments_csv(&sample_plan(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "unit,district\n0,1\n1,1\n2,2\n");
    }

    #[test]
    fn test_empty_plan_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        write_assignments_csv(&DistrictPlan::from_assignments(Vec::new()), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "unit,district\n");
    }
}
