// SPDX-License-Identifier: AGPL-3.0-only

//! Crooks fluctuation theorem consistency check.
//!
//! The Crooks relation
//!
//! ```text
//! P_f(W) / P_b(−W) = exp(β (W − ΔF))
//! ```
//!
//! makes the forward work density and the mirrored backward density equal
//! at W = ΔF. With ΔF = 0 for the translated harmonic trap, the check
//! histograms both work samples, takes the forward bin nearest W = 0 and
//! the backward bin whose negated center is nearest 0, and requires the two
//! densities to agree within [`CFT_CROSSING_DENSITY_ABS`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CftError, Result};
use crate::histogram::DensityHistogram;
use crate::table::{TrajectoryReader, DIRECTION_COLUMN, WORK_COLUMN};
use crate::tolerances::{CFT_CROSSING_DENSITY_ABS, CFT_CROSSING_WORK, CFT_HISTOGRAM_BINS};
use crate::validation::ValidationHarness;

/// Protocol direction of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Trap moved from λ = 0 to λ = 5 (`isForward == 1`).
    Forward,
    /// Trap moved from λ = 5 to λ = 0 (`isForward == 0`).
    Backward,
}

impl Direction {
    /// Classify an indicator cell value; anything but exactly 1 or 0 is
    /// neither direction.
    #[must_use]
    #[allow(clippy::float_cmp)] // indicator cells hold exact small integers
    pub fn from_indicator(value: f64) -> Option<Self> {
        if value == 1.0 {
            Some(Self::Forward)
        } else if value == 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.pad("forward"),
            Self::Backward => f.pad("backward"),
        }
    }
}

/// Work values split by protocol direction.
#[derive(Clone, Debug, Default)]
pub struct WorkSamples {
    /// Work of forward trajectories.
    pub forward: Vec<f64>,
    /// Work of backward trajectories.
    pub backward: Vec<f64>,
    /// Rows whose indicator is neither 0 nor 1.
    pub unassigned: usize,
}

/// Read `w` and `isForward` from every row of the table at `path`.
///
/// # Errors
///
/// Returns [`CftError::MissingColumn`] if either column is absent and
/// [`CftError::InvalidValue`] if an indicator cell, or the work cell of a
/// selected row, is missing or non-numeric.
pub fn collect_work(path: &Path) -> Result<WorkSamples> {
    let mut reader = TrajectoryReader::open(path)?;
    let work_idx = reader.column_index(WORK_COLUMN)?;
    let dir_idx = reader.column_index(DIRECTION_COLUMN)?;

    let mut samples = WorkSamples::default();
    while let Some(record) = reader.next_record()? {
        let indicator = record.number(dir_idx, DIRECTION_COLUMN)?;
        match Direction::from_indicator(indicator) {
            Some(Direction::Forward) => {
                samples.forward.push(record.number(work_idx, WORK_COLUMN)?);
            }
            Some(Direction::Backward) => {
                samples.backward.push(record.number(work_idx, WORK_COLUMN)?);
            }
            None => samples.unassigned += 1,
        }
    }
    debug!(
        forward = samples.forward.len(),
        backward = samples.backward.len(),
        unassigned = samples.unassigned,
        "work samples collected"
    );
    Ok(samples)
}

/// The selected crossing bin of one direction's histogram.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrossingBin {
    /// Number of work samples histogrammed.
    pub samples: usize,
    /// Smallest work value.
    pub work_min: f64,
    /// Largest work value.
    pub work_max: f64,
    /// Histogram bin width.
    pub bin_width: f64,
    /// Selected bin index.
    pub bin: usize,
    /// Bin center on the sample's own work axis.
    pub center: f64,
    /// Probability density of the selected bin.
    pub density: f64,
}

impl CrossingBin {
    fn select(direction: Direction, work: &[f64]) -> Result<Self> {
        if work.is_empty() {
            return Err(CftError::EmptySubset(direction));
        }
        let hist = DensityHistogram::compute(work, CFT_HISTOGRAM_BINS)?;
        let mirrored = direction == Direction::Backward;
        let bin = hist.nearest_bin(CFT_CROSSING_WORK, mirrored);
        let centers = hist.centers();
        Ok(Self {
            samples: work.len(),
            work_min: hist.edges[0],
            work_max: hist.edges[hist.n_bins()],
            bin_width: hist.width(bin),
            bin,
            center: centers[bin],
            density: hist.densities[bin],
        })
    }
}

/// Result of the crossing comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrooksCrossing {
    /// Forward histogram bin nearest W = 0.
    pub forward: CrossingBin,
    /// Backward histogram bin whose negated center is nearest W = 0.
    pub backward: CrossingBin,
    /// |p_f − p_b| at the selected bins.
    pub difference: f64,
    /// Rows that belonged to neither direction.
    pub unassigned_rows: usize,
}

/// Compare forward and backward work densities at the crossing work.
///
/// # Errors
///
/// Returns [`CftError::EmptySubset`] if either sample is empty and
/// [`CftError::InvalidInput`] if a sample contains non-finite values.
pub fn crossing_from_samples(forward: &[f64], backward: &[f64]) -> Result<CrooksCrossing> {
    let forward = CrossingBin::select(Direction::Forward, forward)?;
    let backward = CrossingBin::select(Direction::Backward, backward)?;
    let difference = (forward.density - backward.density).abs();
    Ok(CrooksCrossing {
        forward,
        backward,
        difference,
        unassigned_rows: 0,
    })
}

/// Run the Crooks crossing check on the table at `path`.
///
/// # Errors
///
/// Propagates errors from [`collect_work`] and [`crossing_from_samples`].
pub fn check_crooks(path: &Path) -> Result<CrooksCrossing> {
    let samples = collect_work(path)?;
    let mut crossing = crossing_from_samples(&samples.forward, &samples.backward)?;
    crossing.unassigned_rows = samples.unassigned;
    info!(
        p_forward = crossing.forward.density,
        p_backward = crossing.backward.density,
        difference = crossing.difference,
        "crooks crossing evaluated"
    );
    Ok(crossing)
}

impl CrooksCrossing {
    /// Whether the densities agree within tolerance (strict).
    #[must_use]
    pub fn passed(&self) -> bool {
        self.difference < CFT_CROSSING_DENSITY_ABS
    }

    /// Record the crossing density check.
    pub fn record(&self, harness: &mut ValidationHarness) {
        harness.check_abs(
            "CFT crossing: p_f(W≈0) vs p_b(−W≈0)",
            self.forward.density,
            self.backward.density,
            CFT_CROSSING_DENSITY_ABS,
        );
    }

    /// Print the crossing section.
    pub fn print(&self) {
        println!("  ── Crooks crossing (W = {CFT_CROSSING_WORK}) ──");
        for (direction, side, axis) in [
            (Direction::Forward, &self.forward, "W"),
            (Direction::Backward, &self.backward, "−W"),
        ] {
            println!(
                "    {direction:<8} n={:>6}  W∈[{:.4}, {:.4}]  bin {:>2}/{CFT_HISTOGRAM_BINS} at {axis}={:+.4}  p={:.6}",
                side.samples,
                side.work_min,
                side.work_max,
                side.bin,
                if direction == Direction::Backward {
                    -side.center
                } else {
                    side.center
                },
                side.density
            );
        }
        println!(
            "    |p_f − p_b| = {:.6} (tolerance {CFT_CROSSING_DENSITY_ABS})",
            self.difference
        );
        if self.unassigned_rows > 0 {
            println!(
                "    {} rows with isForward ∉ {{0, 1}} ignored",
                self.unassigned_rows
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Logistic quantiles: deterministic, smooth, symmetric about `mean`.
    #[allow(clippy::cast_precision_loss)]
    fn logistic_sample(n: usize, mean: f64, scale: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let p = (i as f64 + 0.5) / n as f64;
                mean + scale * (p / (1.0 - p)).ln()
            })
            .collect()
    }

    #[test]
    fn indicator_classification() {
        assert_eq!(Direction::from_indicator(1.0), Some(Direction::Forward));
        assert_eq!(Direction::from_indicator(0.0), Some(Direction::Backward));
        assert_eq!(Direction::from_indicator(-0.0), Some(Direction::Backward));
        assert_eq!(Direction::from_indicator(2.0), None);
        assert_eq!(Direction::from_indicator(0.5), None);
        assert_eq!(Direction::from_indicator(f64::NAN), None);
    }

    #[test]
    #[allow(clippy::float_cmp)] // identical inputs give identical bits
    fn identical_samples_cross_exactly() {
        let w = logistic_sample(10_000, 0.0, 1.0);
        let c = crossing_from_samples(&w, &w).unwrap();
        assert_eq!(c.difference, 0.0);
        assert_eq!(c.forward.bin, c.backward.bin);
        assert!(c.passed());
    }

    #[test]
    fn consistent_distributions_pass() {
        // Different sample sizes give different bin grids; both densities
        // near 0 stay close to the logistic peak 1/4.
        let f = logistic_sample(10_000, 0.0, 1.0);
        let b = logistic_sample(9_000, 0.0, 1.0);
        let c = crossing_from_samples(&f, &b).unwrap();
        assert!(c.passed(), "difference {}", c.difference);
        assert!((c.forward.density - 0.25).abs() < 0.01);
    }

    #[test]
    fn shifted_backward_fails() {
        let f = logistic_sample(10_000, 0.0, 1.0);
        let b = logistic_sample(10_000, 3.0, 1.0);
        let c = crossing_from_samples(&f, &b).unwrap();
        assert!(!c.passed(), "difference {}", c.difference);
        assert!(c.difference > 0.15);
    }

    #[test]
    fn backward_bin_uses_negated_centers() {
        // All backward work positive, so every mirrored center is negative
        // and the lowest bin is nearest.
        let b = logistic_sample(1_000, 10.0, 1.0);
        let c = crossing_from_samples(&[0.0, 1.0], &b).unwrap();
        assert_eq!(c.backward.bin, 0);
        assert!(c.backward.center > 0.0);
    }

    /// Integers −20 … 20: over 40 bins every edge is an integer.
    fn unit_grid() -> Vec<f64> {
        (-20..=20).map(f64::from).collect()
    }

    #[test]
    #[allow(clippy::float_cmp)] // unit-width bins are exact
    fn forty_unit_bins_hand_computed() {
        // range [−20, 20] / 40 bins → width 1; centers ±0.5 tie at 0, the
        // lower bin 19 = [−1, 0) wins and holds only −1.
        let f = unit_grid();
        let mut b = unit_grid();
        b.push(-0.5);
        let c = crossing_from_samples(&f, &b).unwrap();

        assert_eq!(c.forward.bin_width, 1.0);
        assert_eq!(c.forward.bin, 19);
        assert_eq!(c.forward.center, -0.5);
        assert_eq!(c.forward.density, 1.0 / 41.0);

        assert_eq!(c.backward.bin_width, 1.0);
        assert_eq!(c.backward.bin, 19);
        assert_eq!(c.backward.density, 2.0 / 42.0);

        let expected = 2.0 / 42.0 - 1.0 / 41.0;
        assert!((c.difference - expected).abs() < 1e-15);
        assert!(!c.passed(), "{} exceeds the tolerance", c.difference);
    }

    #[test]
    fn tolerance_boundary_is_strict() {
        let w = unit_grid();
        let mut c = crossing_from_samples(&w, &w).unwrap();
        c.difference = CFT_CROSSING_DENSITY_ABS;
        assert!(!c.passed(), "|p_f − p_b| equal to the tolerance fails");
        c.difference = 0.0149;
        assert!(c.passed());
        c.difference = 0.0151;
        assert!(!c.passed());
        c.difference = 0.02;
        assert!(!c.passed());
    }

    #[test]
    fn empty_subsets_are_errors() {
        let w = [1.0, 2.0];
        assert!(matches!(
            crossing_from_samples(&[], &w),
            Err(CftError::EmptySubset(Direction::Forward))
        ));
        assert!(matches!(
            crossing_from_samples(&w, &[]),
            Err(CftError::EmptySubset(Direction::Backward))
        ));
    }

    #[test]
    fn record_matches_passed() {
        let f = logistic_sample(2_000, 0.0, 1.0);
        for shift in [0.0, 4.0] {
            let b = logistic_sample(2_000, shift, 1.0);
            let c = crossing_from_samples(&f, &b).unwrap();
            let mut h = ValidationHarness::new("crooks");
            c.record(&mut h);
            assert_eq!(h.all_passed(), c.passed(), "shift {shift}");
        }
    }
}
