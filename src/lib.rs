//! CFT trajectory dataset validation
//!
//! Validates `trajectory.csv`, a table of 20,000 overdamped Langevin
//! trajectories of a particle in a translated harmonic trap (10,000 forward,
//! 10,000 backward), before it is used in downstream fluctuation-theorem
//! analysis.
//!
//! ## Checks
//!   - `shape`: exactly 20,000 data rows and 1003 columns
//!   - `missing`: Euclidean norm of per-column missing counts is zero
//!   - `crooks`: 40-bin forward and mirrored backward work densities agree
//!     at W = ΔF = 0 within 0.015
//!
//! ## Supporting modules
//!   - `table`: streaming CSV reader with NA-token detection
//!   - `histogram`: equal-width density histograms
//!   - `validation`: pass/fail harness and exit code
//!   - `report`: JSON report of a run
//!   - `discovery`: locating the dataset at runtime
//!   - `tolerances`, `provenance`: fixed expectations and their origin
//!
//! ## Validation binary
//!   - `validate_trajectory`: runs the checks, exit 0 on success, 1 otherwise
//!
//! The binary is the gate for a dataset. The tests that read the real
//! `trajectory.csv` are `#[ignore]`d so `cargo test` runs without it; use
//! `cargo test -- --ignored` or the binary to validate an actual file.

pub mod checks;
pub mod discovery;
pub mod error;
pub mod histogram;
pub mod provenance;
pub mod report;
pub mod table;
pub mod tolerances;
pub mod validation;

pub use error::{CftError, Result};
