// SPDX-License-Identifier: AGPL-3.0-only

//! Machine-readable validation report.
//!
//! Carries no timestamp or host information, so the JSON for a given file
//! is identical across runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checks::{CrooksCrossing, MissingReport, ShapeReport};
use crate::error::{CftError, Result};
use crate::validation::{Check, ValidationHarness};

/// A check that stopped on an error instead of producing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Check name (`shape`, `missing`, `crooks`).
    pub check: String,
    /// Rendered error.
    pub message: String,
}

/// Outcome of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Harness name.
    pub name: String,
    /// Dataset path as given to the checks.
    pub dataset: String,
    /// Whether every recorded check passed.
    pub all_passed: bool,
    /// Recorded checks in order.
    pub checks: Vec<Check>,
    /// Shape details, if the shape check ran.
    pub shape: Option<ShapeReport>,
    /// Missing-value details, if the missing check ran.
    pub missing: Option<MissingReport>,
    /// Crossing details, if the Crooks check ran.
    pub crooks: Option<CrooksCrossing>,
    /// Checks that could not run, in run order.
    pub errors: Vec<CheckFailure>,
}

impl ValidationReport {
    /// Empty report for `dataset`.
    #[must_use]
    pub fn new(name: &str, dataset: &Path) -> Self {
        Self {
            name: name.to_string(),
            dataset: dataset.display().to_string(),
            all_passed: true,
            checks: Vec::new(),
            shape: None,
            missing: None,
            crooks: None,
            errors: Vec::new(),
        }
    }

    /// Copy the harness checks and overall outcome into the report.
    pub fn attach_checks(&mut self, harness: &ValidationHarness) {
        self.checks.clone_from(&harness.checks);
        self.all_passed = harness.all_passed();
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::Report`] if serialization fails (a non-finite
    /// float serializes as `null`, so this is not expected in practice).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CftError::Report(e.to_string()))
    }

    /// Write the JSON report to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::Report`] if serialization fails and
    /// [`CftError::Io`] if the file cannot be written.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| CftError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, json).map_err(|source| CftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "report written");
        Ok(())
    }
}
