// SPDX-License-Identifier: AGPL-3.0-only

//! Trajectory dataset validation.
//!
//! Runs the shape, missing-value, and Crooks crossing checks against
//! `trajectory.csv` (see `cft_validate::discovery` for how the file is
//! located).
//!
//! ```text
//! validate_trajectory [--data=PATH] [--json=PATH] [--only=shape,missing,crooks]
//! ```
//!
//! Every selected check runs even if an earlier one errors; an error is
//! reported as a failed check. Exit code 0 = all checks pass, 1 = any
//! failure or error.

use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cft_validate::checks::{run_checks, CheckKind};
use cft_validate::discovery::DiscoveryInputs;
use cft_validate::provenance::DATASET_PROVENANCE;
use cft_validate::report::ValidationReport;
use cft_validate::validation::ValidationHarness;

struct CliArgs {
    data: Option<PathBuf>,
    json: Option<PathBuf>,
    checks: Vec<CheckKind>,
}

fn parse_args() -> CliArgs {
    let mut data = None;
    let mut json = None;
    let mut checks = CheckKind::ALL.to_vec();

    for arg in std::env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--data=") {
            data = Some(PathBuf::from(val));
        } else if let Some(val) = arg.strip_prefix("--json=") {
            json = Some(PathBuf::from(val));
        } else if let Some(val) = arg.strip_prefix("--only=") {
            checks = CheckKind::parse_list(val);
            if checks.is_empty() {
                warn!(only = val, "no known checks selected, running all");
                checks = CheckKind::ALL.to_vec();
            }
        } else {
            warn!(arg = %arg, "unknown argument ignored");
        }
    }

    CliArgs { data, json, checks }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = parse_args();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Trajectory dataset validation                               ║");
    println!("║  shape · missing values · Crooks crossing at W = 0           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let discovered = DiscoveryInputs::from_env(args.data.as_deref()).resolve();
    println!(
        "  dataset: {} (via {})",
        discovered.path.display(),
        discovered.source
    );
    println!();
    info!(path = %discovered.path.display(), source = %discovered.source, "dataset resolved");

    let mut harness = ValidationHarness::new("trajectory");
    harness.print_provenance(&DATASET_PROVENANCE);

    let mut report = ValidationReport::new(&harness.name, &discovered.path);
    let errors = run_checks(&args.checks, &discovered.path, &mut harness, &mut report);
    if errors > 0 {
        warn!(errors, "some checks could not run");
    }
    report.attach_checks(&harness);

    if let Some(path) = &args.json {
        match report.save_json(path) {
            Ok(()) => println!("  report written to {}", path.display()),
            Err(e) => {
                error!(error = %e, "report not written");
                eprintln!("error: {e}");
                harness.check_error("json report: not written");
            }
        }
    }

    harness.finish();
}
