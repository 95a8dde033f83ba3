// SPDX-License-Identifier: AGPL-3.0-only

//! Equal-width density histograms of work samples.
//!
//! Binning follows the usual array-library convention so densities agree
//! with a reference analysis bit for bit where possible:
//!   - range = [min, max] of the data, widened by ±0.5 when min == max
//!   - `n_bins + 1` evenly spaced edges, last edge exactly `max`
//!   - bins half-open `[e_i, e_{i+1})` except the last, which is closed
//!   - density_i = count_i / width_i / total, so Σ density_i · width_i = 1

use crate::error::{CftError, Result};
use crate::tolerances::DEGENERATE_RANGE_HALF_WIDTH;

/// Density histogram over `n_bins` equal-width bins.
#[derive(Clone, Debug)]
pub struct DensityHistogram {
    /// Bin edges, `n_bins + 1` values, increasing.
    pub edges: Vec<f64>,
    /// Raw counts per bin.
    pub counts: Vec<u64>,
    /// Probability density per bin.
    pub densities: Vec<f64>,
}

impl DensityHistogram {
    /// Histogram `values` into `n_bins` density-normalised bins.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::InvalidInput`] if `values` is empty, `n_bins` is
    /// zero, or the data range is not finite (NaN or infinite samples).
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    pub fn compute(values: &[f64], n_bins: usize) -> Result<Self> {
        if n_bins == 0 {
            return Err(CftError::InvalidInput("histogram needs at least one bin".into()));
        }
        if values.is_empty() {
            return Err(CftError::InvalidInput("cannot histogram an empty sample".into()));
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.iter().any(|v| v.is_nan()) || !lo.is_finite() || !hi.is_finite() {
            return Err(CftError::InvalidInput(format!(
                "sample range [{lo}, {hi}] is not finite"
            )));
        }
        if lo == hi {
            lo -= DEGENERATE_RANGE_HALF_WIDTH;
            hi += DEGENERATE_RANGE_HALF_WIDTH;
        }

        let edges = linspace(lo, hi, n_bins + 1);
        let span = hi - lo;
        let mut counts = vec![0u64; n_bins];
        for &v in values {
            // Fast estimate, then correct against the actual edges so that
            // a value sitting on an edge lands in the bin it opens.
            let mut bin = (((v - lo) / span) * n_bins as f64) as usize;
            if bin >= n_bins {
                bin = n_bins - 1;
            }
            if v < edges[bin] && bin > 0 {
                bin -= 1;
            } else if v >= edges[bin + 1] && bin != n_bins - 1 {
                bin += 1;
            }
            counts[bin] += 1;
        }

        let total = values.len() as f64;
        let densities = counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&c, e)| c as f64 / (e[1] - e[0]) / total)
            .collect();

        Ok(Self {
            edges,
            counts,
            densities,
        })
    }

    /// Number of bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin centers: midpoints of adjacent edges.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|e| (e[1] + e[0]) / 2.0).collect()
    }

    /// Width of bin `i`.
    #[must_use]
    pub fn width(&self, i: usize) -> f64 {
        self.edges[i + 1] - self.edges[i]
    }

    /// Σ density_i · width_i, which is 1 up to rounding.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.densities
            .iter()
            .enumerate()
            .map(|(i, d)| d * self.width(i))
            .sum()
    }

    /// Index of the bin whose center is nearest `target`.
    ///
    /// With `mirrored`, centers are negated before comparing, i.e. the bin
    /// nearest `-target` on the original axis. Ties resolve to the lowest
    /// index.
    #[must_use]
    pub fn nearest_bin(&self, target: f64, mirrored: bool) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, c) in self.centers().into_iter().enumerate() {
            let x = if mirrored { -c } else { c };
            let dist = (x - target).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n - 1) as f64;
    let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    points[n - 1] = stop;
    points
}
