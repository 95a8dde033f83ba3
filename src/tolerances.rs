// SPDX-License-Identifier: AGPL-3.0-only

//! Fixed acceptance constants for trajectory dataset validation.
//!
//! Every threshold used by the checks is defined here with its origin.
//! None of them is configurable at runtime: a different value means a
//! different dataset, and that deserves a code change.
//!
//! | Check | Constant | Value |
//! |-------|----------|-------|
//! | Shape | [`EXPECTED_ROWS`] × [`EXPECTED_COLUMNS`] | 20,000 × 1003 |
//! | Missing values | [`EXPECTED_MISSING_NORM`] | 0 (exact) |
//! | CFT crossing | [`CFT_HISTOGRAM_BINS`], [`CFT_CROSSING_DENSITY_ABS`] | 40 bins, 0.015 |

// ═══════════════════════════════════════════════════════════════════
// Dataset shape
// ═══════════════════════════════════════════════════════════════════

/// Data rows in `trajectory.csv` (header excluded).
///
/// 10,000 forward plus 10,000 backward trajectories.
pub const EXPECTED_ROWS: usize = 20_000;

/// Columns in `trajectory.csv`.
///
/// 1001 position columns `x_0 … x_1000`, then `w` and `isForward`.
pub const EXPECTED_COLUMNS: usize = 1003;

/// Euclidean norm of the per-column missing-value counts.
///
/// Exact: a single missing cell anywhere fails the check.
pub const EXPECTED_MISSING_NORM: f64 = 0.0;

// ═══════════════════════════════════════════════════════════════════
// Crooks crossing
// ═══════════════════════════════════════════════════════════════════

/// Number of bins in each work density histogram.
///
/// Fixed empirical choice for 10,000 samples per direction. Bin edges span
/// each subset's own [min, max], so forward and backward grids differ.
pub const CFT_HISTOGRAM_BINS: usize = 40;

/// Maximum |p_f(W) − p_b(−W)| at the bin nearest the crossing work.
///
/// Empirical: absorbs shot noise of the two histograms and the offset
/// between the two bin grids. Strict inequality.
pub const CFT_CROSSING_DENSITY_ABS: f64 = 0.015;

/// Work at which forward and mirrored backward densities must cross.
///
/// Crooks: P_f(W) / P_b(−W) = exp(β(W − ΔF)), equal at W = ΔF. Translating
/// a harmonic trap leaves its free energy unchanged, so ΔF = 0 (see
/// [`crate::provenance::FREE_ENERGY_DIFFERENCE`]).
pub const CFT_CROSSING_WORK: f64 = 0.0;

/// Half-width used to widen a degenerate (min == max) histogram range.
pub const DEGENERATE_RANGE_HALF_WIDTH: f64 = 0.5;
