// SPDX-License-Identifier: AGPL-3.0-only

//! The three dataset checks.
//!
//! Each check streams the table independently and returns a report; the
//! report's `record` method turns it into harness checks. Reports carry
//! the observed values so the JSON report can be written without
//! re-reading the file.

pub mod crooks;
pub mod missing;
pub mod shape;

use std::fmt;
use std::path::Path;

use tracing::{error, warn};

use crate::error::Result;
use crate::report::{CheckFailure, ValidationReport};
use crate::validation::ValidationHarness;

pub use crooks::{check_crooks, crossing_from_samples, CrooksCrossing, Direction};
pub use missing::{check_missing, MissingReport};
pub use shape::{check_shape, ShapeReport};

/// Which check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Row and column counts.
    Shape,
    /// No missing cells anywhere.
    Missing,
    /// Forward/backward work densities cross at W = 0.
    Crooks,
}

impl CheckKind {
    /// All checks, in run order.
    pub const ALL: [Self; 3] = [Self::Shape, Self::Missing, Self::Crooks];

    /// Parse from a CLI argument string.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "shape" | "size" => Some(Self::Shape),
            "missing" | "nan" | "nans" => Some(Self::Missing),
            "crooks" | "cft" => Some(Self::Crooks),
            _ => None,
        }
    }

    /// Parse a comma-separated list, skipping (and logging) unknown names.
    #[must_use]
    pub fn parse_list(s: &str) -> Vec<Self> {
        let mut kinds = Vec::new();
        for name in s.split(',').filter(|n| !n.trim().is_empty()) {
            match Self::from_arg(name) {
                Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Some(_) => {}
                None => warn!(check = name, "unknown check name, ignored"),
            }
        }
        kinds
    }

    /// Section heading printed before the check runs.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Shape => "Dataset shape",
            Self::Missing => "Missing values",
            Self::Crooks => "Crooks fluctuation theorem crossing",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape => write!(f, "shape"),
            Self::Missing => write!(f, "missing"),
            Self::Crooks => write!(f, "crooks"),
        }
    }
}

/// Run one check against `path`, record it in `harness`, and attach its
/// details to `report`.
///
/// # Errors
///
/// Propagates any read or parse error from the underlying check.
pub fn run_check(
    kind: CheckKind,
    path: &Path,
    harness: &mut ValidationHarness,
    report: &mut ValidationReport,
) -> Result<()> {
    match kind {
        CheckKind::Shape => {
            let shape = check_shape(path)?;
            shape.print();
            shape.record(harness);
            report.shape = Some(shape);
        }
        CheckKind::Missing => {
            let missing = check_missing(path)?;
            missing.print();
            missing.record(harness);
            report.missing = Some(missing);
        }
        CheckKind::Crooks => {
            let crossing = check_crooks(path)?;
            crossing.print();
            crossing.record(harness);
            report.crooks = Some(crossing);
        }
    }
    Ok(())
}

/// Run `kinds` in order against `path`, continuing past checks that error.
///
/// A check that cannot run (unreadable file, malformed record, bad cell) is
/// recorded as a failed harness check labelled `"<kind>: could not run"` and
/// listed in `report.errors`; the remaining checks still run. Returns the
/// number of checks that errored.
pub fn run_checks(
    kinds: &[CheckKind],
    path: &Path,
    harness: &mut ValidationHarness,
    report: &mut ValidationReport,
) -> usize {
    let mut errors = 0;
    for &kind in kinds {
        println!("  ▸ {}", kind.description());
        if let Err(e) = run_check(kind, path, harness, report) {
            error!(check = %kind, error = %e, "check could not run");
            println!("    ✗ {kind} check could not run: {e}");
            println!();
            harness.check_error(&format!("{kind}: could not run"));
            report.errors.push(CheckFailure {
                check: kind.to_string(),
                message: e.to_string(),
            });
            errors += 1;
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arg_aliases() {
        assert_eq!(CheckKind::from_arg("shape"), Some(CheckKind::Shape));
        assert_eq!(CheckKind::from_arg("NaN"), Some(CheckKind::Missing));
        assert_eq!(CheckKind::from_arg(" CFT "), Some(CheckKind::Crooks));
        assert_eq!(CheckKind::from_arg("jarzynski"), None);
    }

    #[test]
    fn parse_list_dedups_and_skips_unknown() {
        let kinds = CheckKind::parse_list("crooks,bogus,shape,,crooks");
        assert_eq!(kinds, vec![CheckKind::Crooks, CheckKind::Shape]);
    }

    #[test]
    fn display_round_trips_through_from_arg() {
        for kind in CheckKind::ALL {
            assert_eq!(CheckKind::from_arg(&kind.to_string()), Some(kind));
            assert!(!kind.description().is_empty());
        }
    }
}
