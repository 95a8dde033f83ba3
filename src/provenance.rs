// SPDX-License-Identifier: AGPL-3.0-only

//! Provenance of the trajectory dataset.
//!
//! The checks validate a file produced elsewhere; these records pin down
//! how it was produced so that every expected value traces back to a
//! generation parameter or a physical identity.
//!
//! # Generation model
//!
//! ```text
//! overdamped Langevin, Euler–Maruyama:
//!   x ← x − (k/γ)(x − λ(t)) dt + √(2 dt / βγ) ξ,   ξ ~ N(0, 1)
//!   W += U(x, λ_new) − U(x, λ_old),                U = ½ k (x − λ)²
//!   λ ← λ ± u dt,  u = λ_total / (n_steps · dt)    constant trap speed
//! forward:  λ: 0 → 5,  x₀ ~ N(0, 1/βk)
//! backward: λ: 5 → 0,  x₀ ~ λ₀ + N(0, 1/βk)
//! ```

/// A single provenance record tying an expected value to its origin.
#[derive(Debug, Clone)]
pub struct BaselineProvenance {
    /// Human-readable label
    pub label: &'static str,
    /// Where the value comes from (generator parameter or physical identity)
    pub source: &'static str,
    /// The reference value itself
    pub value: f64,
    /// Unit or description of the value
    pub unit: &'static str,
}

// ═══════════════════════════════════════════════════════════════════
// Generator parameters
// ═══════════════════════════════════════════════════════════════════

/// Harmonic trap spring constant k.
pub const SPRING_CONSTANT: BaselineProvenance = BaselineProvenance {
    label: "spring constant k",
    source: "Langevin generator parameter",
    value: 1.0,
    unit: "reduced units",
};

/// Inverse temperature β = 1 / k_B T.
pub const INVERSE_TEMPERATURE: BaselineProvenance = BaselineProvenance {
    label: "inverse temperature β",
    source: "Langevin generator parameter",
    value: 1.0,
    unit: "1/k_B T",
};

/// Friction coefficient γ.
pub const FRICTION: BaselineProvenance = BaselineProvenance {
    label: "friction γ",
    source: "Langevin generator parameter",
    value: 1.0,
    unit: "reduced units",
};

/// Total trap displacement |λ_final − λ_initial|.
pub const TRAP_DISPLACEMENT: BaselineProvenance = BaselineProvenance {
    label: "trap displacement λ",
    source: "Langevin generator parameter (forward 0→5, backward 5→0)",
    value: 5.0,
    unit: "reduced length",
};

/// Integration time step dt.
pub const TIME_STEP: BaselineProvenance = BaselineProvenance {
    label: "time step dt",
    source: "Langevin generator parameter",
    value: 0.1,
    unit: "reduced time",
};

/// Integration steps per trajectory.
pub const STEP_COUNT: BaselineProvenance = BaselineProvenance {
    label: "integration steps",
    source: "Langevin generator parameter",
    value: 100.0,
    unit: "steps",
};

/// Trap speed u = displacement / (steps · dt).
pub const TRAP_SPEED: BaselineProvenance = BaselineProvenance {
    label: "trap speed u",
    source: "displacement / (steps × dt), constant over the protocol",
    value: 0.5,
    unit: "reduced length/time",
};

/// Trajectories generated per protocol direction.
pub const TRAJECTORIES_PER_DIRECTION: BaselineProvenance = BaselineProvenance {
    label: "trajectories per direction",
    source: "dataset shape (rows / 2)",
    value: 10_000.0,
    unit: "trajectories",
};

/// Positions stored per trajectory (initial point plus one per step).
pub const POSITIONS_PER_TRAJECTORY: BaselineProvenance = BaselineProvenance {
    label: "positions per trajectory",
    source: "dataset shape (columns − w − isForward)",
    value: 1001.0,
    unit: "samples",
};

// ═══════════════════════════════════════════════════════════════════
// Physical expectations
// ═══════════════════════════════════════════════════════════════════

/// Free-energy difference between the initial and final trap positions.
///
/// Z(λ) = ∫ exp(−βk(x − λ)²/2) dx is independent of λ, so ΔF = 0 and the
/// Crooks crossing sits at W = 0.
pub const FREE_ENERGY_DIFFERENCE: BaselineProvenance = BaselineProvenance {
    label: "free-energy difference ΔF",
    source: "harmonic trap translation invariance of Z(λ)",
    value: 0.0,
    unit: "k_B T",
};

/// All records printed by the validation binary, in display order.
pub const DATASET_PROVENANCE: [&BaselineProvenance; 10] = [
    &SPRING_CONSTANT,
    &INVERSE_TEMPERATURE,
    &FRICTION,
    &TRAP_DISPLACEMENT,
    &TIME_STEP,
    &STEP_COUNT,
    &TRAP_SPEED,
    &TRAJECTORIES_PER_DIRECTION,
    &POSITIONS_PER_TRAJECTORY,
    &FREE_ENERGY_DIFFERENCE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{EXPECTED_COLUMNS, EXPECTED_ROWS};

    #[test]
    fn records_have_content() {
        for p in DATASET_PROVENANCE {
            assert!(!p.label.is_empty(), "label must not be empty");
            assert!(!p.source.is_empty(), "{}: source must not be empty", p.label);
            assert!(!p.unit.is_empty(), "{}: unit must not be empty", p.label);
            assert!(p.value.is_finite(), "{}: value must be finite", p.label);
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)] // small integer constants
    fn shape_constants_agree_with_generation() {
        assert!(
            (TRAJECTORIES_PER_DIRECTION.value * 2.0 - EXPECTED_ROWS as f64).abs() < f64::EPSILON
        );
        assert!(
            (POSITIONS_PER_TRAJECTORY.value + 2.0 - EXPECTED_COLUMNS as f64).abs() < f64::EPSILON
        );
    }

    #[test]
    fn trap_speed_is_displacement_over_duration() {
        let duration = STEP_COUNT.value * TIME_STEP.value;
        assert!((duration - 10.0).abs() < 1e-12, "protocol lasts 10 time units");
        assert!((TRAP_DISPLACEMENT.value / duration - TRAP_SPEED.value).abs() < 1e-12);
    }

    #[test]
    fn generator_parameters_are_positive() {
        for p in [
            &SPRING_CONSTANT,
            &INVERSE_TEMPERATURE,
            &FRICTION,
            &TRAP_DISPLACEMENT,
            &TIME_STEP,
            &STEP_COUNT,
            &TRAP_SPEED,
        ] {
            assert!(p.value > 0.0, "{} must be positive", p.label);
        }
    }
}
