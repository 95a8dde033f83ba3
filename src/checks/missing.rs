// SPDX-License-Identifier: AGPL-3.0-only

//! Missing values: per-column counts and their Euclidean norm.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::table::{is_missing, TrajectoryReader};
use crate::tolerances::EXPECTED_MISSING_NORM;
use crate::validation::ValidationHarness;

/// Missing-value count for one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    /// Column name from the header.
    pub column: String,
    /// Number of missing cells.
    pub count: u64,
}

/// Per-column missing-value summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingReport {
    /// Columns scanned.
    pub columns: usize,
    /// Data rows scanned.
    pub rows: usize,
    /// Total missing cells in the table.
    pub total_missing: u64,
    /// Euclidean norm of the per-column count vector.
    pub norm: f64,
    /// Columns with at least one missing cell, in header order.
    pub offending: Vec<ColumnMissing>,
}

/// Count missing cells per column of the table at `path`.
///
/// A record shorter than the header contributes one missing cell for
/// every absent trailing column.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a record is wider than
/// the header.
pub fn check_missing(path: &Path) -> Result<MissingReport> {
    let mut reader = TrajectoryReader::open(path)?;
    let header = reader.header().to_vec();
    let mut counts = vec![0u64; header.len()];
    let mut rows = 0usize;
    while let Some(record) = reader.next_record()? {
        rows += 1;
        for (count, field) in counts.iter_mut().zip(record.fields()) {
            if is_missing(field) {
                *count += 1;
            }
        }
        for count in counts.iter_mut().skip(record.len()) {
            *count += 1;
        }
    }

    let report = MissingReport::from_counts(&header, &counts, rows);
    if report.offending.is_empty() {
        info!(rows, columns = report.columns, "no missing values");
    } else {
        warn!(
            total = report.total_missing,
            columns = report.offending.len(),
            "missing values found"
        );
    }
    Ok(report)
}

impl MissingReport {
    /// Build a summary from raw per-column counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // counts stay far below 2^53
    pub fn from_counts(header: &[String], counts: &[u64], rows: usize) -> Self {
        let norm = counts
            .iter()
            .map(|&c| {
                let c = c as f64;
                c * c
            })
            .sum::<f64>()
            .sqrt();
        let offending = header
            .iter()
            .zip(counts)
            .filter(|(_, &c)| c > 0)
            .map(|(name, &count)| ColumnMissing {
                column: name.clone(),
                count,
            })
            .collect();
        Self {
            columns: header.len(),
            rows,
            total_missing: counts.iter().sum(),
            norm,
            offending,
        }
    }

    /// Whether the norm is exactly zero.
    #[must_use]
    #[allow(clippy::float_cmp)] // exact zero is the criterion
    pub fn passed(&self) -> bool {
        self.norm == EXPECTED_MISSING_NORM
    }

    /// Record the norm check.
    pub fn record(&self, harness: &mut ValidationHarness) {
        harness.check_exact(
            "missing-value norm ‖h‖₂",
            self.norm,
            EXPECTED_MISSING_NORM,
        );
    }

    /// Print the missing-value section, listing at most ten columns.
    pub fn print(&self) {
        println!("  ── Missing values ──");
        println!(
            "    scanned {} rows × {} columns: {} missing, ‖h‖₂ = {:.6}",
            self.rows, self.columns, self.total_missing, self.norm
        );
        for c in self.offending.iter().take(10) {
            println!("    {:<12} {:>8} missing", c.column, c.count);
        }
        if self.offending.len() > 10 {
            println!("    … and {} more columns", self.offending.len() - 10);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    #[allow(clippy::float_cmp)] // exact known value
    fn clean_counts_pass() {
        let r = MissingReport::from_counts(&header(&["a", "b"]), &[0, 0], 5);
        assert_eq!(r.norm, 0.0);
        assert!(r.passed());
        assert!(r.offending.is_empty());
    }

    #[test]
    fn norm_is_euclidean() {
        let r = MissingReport::from_counts(&header(&["a", "b", "c"]), &[3, 0, 4], 10);
        assert!((r.norm - 5.0).abs() < 1e-12);
        assert_eq!(r.total_missing, 7);
        assert_eq!(
            r.offending,
            vec![
                ColumnMissing {
                    column: "a".into(),
                    count: 3
                },
                ColumnMissing {
                    column: "c".into(),
                    count: 4
                },
            ]
        );
        assert!(!r.passed());
    }

    #[test]
    fn single_missing_cell_fails_harness() {
        let r = MissingReport::from_counts(&header(&["w"]), &[1], 20_000);
        let mut h = ValidationHarness::new("missing");
        r.record(&mut h);
        assert!(!h.all_passed());
    }
}
