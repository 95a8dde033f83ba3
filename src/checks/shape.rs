// SPDX-License-Identifier: AGPL-3.0-only

//! Dataset shape: exact row and column counts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::table::TrajectoryReader;
use crate::tolerances::{EXPECTED_COLUMNS, EXPECTED_ROWS};
use crate::validation::ValidationHarness;

/// Observed table dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeReport {
    /// Data rows (header and blank lines excluded).
    pub rows: usize,
    /// Columns declared by the header.
    pub columns: usize,
}

/// Count data rows and header columns of the table at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a record is wider than
/// the header.
pub fn check_shape(path: &Path) -> Result<ShapeReport> {
    let mut reader = TrajectoryReader::open(path)?;
    let columns = reader.column_count();
    let mut rows = 0usize;
    while reader.next_record()?.is_some() {
        rows += 1;
    }
    info!(rows, columns, "shape scan complete");
    Ok(ShapeReport { rows, columns })
}

impl ShapeReport {
    /// Whether both dimensions match exactly.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.rows == EXPECTED_ROWS && self.columns == EXPECTED_COLUMNS
    }

    /// Record row and column checks.
    pub fn record(&self, harness: &mut ValidationHarness) {
        harness.check_count("data rows", self.rows, EXPECTED_ROWS);
        harness.check_count("columns", self.columns, EXPECTED_COLUMNS);
    }

    /// Print the shape section.
    pub fn print(&self) {
        println!("  ── Dataset shape ──");
        println!("    rows    = {:>6} (expected {EXPECTED_ROWS})", self.rows);
        println!("    columns = {:>6} (expected {EXPECTED_COLUMNS})", self.columns);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_shape_passes() {
        let shape = ShapeReport {
            rows: EXPECTED_ROWS,
            columns: EXPECTED_COLUMNS,
        };
        assert!(shape.passed());
        let mut h = ValidationHarness::new("shape");
        shape.record(&mut h);
        assert_eq!(h.total_count(), 2);
        assert!(h.all_passed());
    }

    #[test]
    fn either_dimension_off_by_one_fails() {
        for shape in [
            ShapeReport {
                rows: EXPECTED_ROWS - 1,
                columns: EXPECTED_COLUMNS,
            },
            ShapeReport {
                rows: EXPECTED_ROWS,
                columns: EXPECTED_COLUMNS + 1,
            },
        ] {
            assert!(!shape.passed(), "{shape:?}");
            let mut h = ValidationHarness::new("shape");
            shape.record(&mut h);
            assert_eq!(h.passed_count(), 1);
        }
    }
}
