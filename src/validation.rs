// SPDX-License-Identifier: AGPL-3.0-only

//! Validation harness for the trajectory checks.
//!
//! Every validation run follows the same pattern:
//!   - Fixed expected values from [`crate::tolerances`] with provenance
//!   - Explicit pass/fail checks against documented tolerances
//!   - Exit code 0 (all checks pass) or 1 (any check fails)
//!   - Human-readable summary on stdout, optional JSON report
//!
//! This module provides the shared infrastructure.

use std::fmt::Write as _;
use std::process;

use serde::{Deserialize, Serialize};

use crate::provenance::BaselineProvenance;

/// A single validation check with result tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    /// Human-readable label
    pub label: String,
    /// Whether this check passed
    pub passed: bool,
    /// Observed value
    pub observed: f64,
    /// Expected value
    pub expected: f64,
    /// Tolerance used
    pub tolerance: f64,
    /// How the tolerance was applied
    pub mode: ToleranceMode,
}

/// How a tolerance threshold is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceMode {
    /// |observed - expected| < tolerance
    Absolute,
    /// observed == expected, no tolerance
    Exact,
    /// The check could not be evaluated; always a failure
    Error,
}

impl std::fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => write!(f, "abs"),
            Self::Exact => write!(f, "=="),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Accumulates validation checks and produces a summary with exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    /// Name of the validation run
    pub name: String,
    /// All checks performed
    pub checks: Vec<Check>,
}

impl ValidationHarness {
    /// Create a new harness for a named validation run.
    #[must_use = "validation harness must be used to run checks"]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
        }
    }

    /// Add an absolute tolerance check: |observed - expected| < tolerance
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = (observed - expected).abs() < tolerance;
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
            mode: ToleranceMode::Absolute,
        });
    }

    /// Add an exact equality check: observed == expected.
    ///
    /// NaN never passes.
    #[allow(clippy::float_cmp)] // exact comparison is the point
    pub fn check_exact(&mut self, label: &str, observed: f64, expected: f64) {
        self.checks.push(Check {
            label: label.to_string(),
            passed: observed == expected,
            observed,
            expected,
            tolerance: 0.0,
            mode: ToleranceMode::Exact,
        });
    }

    /// Add an exact count check.
    ///
    /// Pass/fail is decided on the integers; the recorded values are the
    /// same counts as `f64` for the summary.
    #[allow(clippy::cast_precision_loss)] // counts stay far below 2^53
    pub fn check_count(&mut self, label: &str, observed: usize, expected: usize) {
        self.checks.push(Check {
            label: label.to_string(),
            passed: observed == expected,
            observed: observed as f64,
            expected: expected as f64,
            tolerance: 0.0,
            mode: ToleranceMode::Exact,
        });
    }

    /// Record a check that could not be evaluated at all.
    ///
    /// Counts as a failure; observed and expected are left at zero so the
    /// JSON report stays free of non-finite values.
    pub fn check_error(&mut self, label: &str) {
        self.checks.push(Check {
            label: label.to_string(),
            passed: false,
            observed: 0.0,
            expected: 0.0,
            tolerance: 0.0,
            mode: ToleranceMode::Error,
        });
    }

    /// Print provenance records for the expected values used in this run.
    pub fn print_provenance(&self, records: &[&BaselineProvenance]) {
        println!("  ── Provenance ({}) ──", self.name);
        for p in records {
            println!(
                "    {:<28} = {:>10} {:<14} [{}]",
                p.label, p.value, p.unit, p.source
            );
        }
        println!();
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Total number of checks.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// Whether all checks passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Labels of the checks that failed, in recording order.
    #[must_use]
    pub fn failed_labels(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.label.as_str())
            .collect()
    }

    /// Process exit code for the current state: 0 if all passed, else 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    /// Format the validation summary as a string.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "═══ {} validation: {}/{} checks passed ═══",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        for check in &self.checks {
            let icon = if check.passed { "✓" } else { "✗" };
            let _ = writeln!(
                s,
                "  {icon} {}: observed={:.6e}, expected={:.6e}, tol={:.2e} ({})",
                check.label, check.observed, check.expected, check.tolerance, check.mode
            );
        }
        if self.all_passed() {
            let _ = writeln!(s, "ALL CHECKS PASSED");
        } else {
            let _ = writeln!(s, "FAILED CHECKS: {}", self.failed_labels().join(", "));
        }
        s
    }

    /// Print summary and exit with appropriate code.
    ///
    /// Exit 0 if all checks pass, exit 1 if any fails.
    pub fn finish(&self) -> ! {
        println!();
        print!("{}", self.format_summary());
        process::exit(self.exit_code());
    }
}
