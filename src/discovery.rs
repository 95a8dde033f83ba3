// SPDX-License-Identifier: AGPL-3.0-only

//! Runtime discovery of `trajectory.csv`.
//!
//! # Discovery order
//!
//! 1. `--data=PATH` on the command line
//! 2. `CFT_TRAJECTORY_CSV` (file path)
//! 3. `CFT_DATA_ROOT` (directory holding `trajectory.csv`)
//! 4. `CARGO_MANIFEST_DIR` (development layout)
//! 5. Current working directory
//!
//! The first candidate that is an existing file wins. When none exists the
//! CWD candidate is returned, so the subsequent read fails with an I/O
//! error naming a concrete path.
//!
//! Resolution is a pure function of [`DiscoveryInputs`], so tests inject
//! inputs instead of mutating process environment.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Dataset file name.
pub const TRAJECTORY_FILE: &str = "trajectory.csv";

/// Environment variable naming the dataset file directly.
pub const TRAJECTORY_ENV: &str = "CFT_TRAJECTORY_CSV";

/// Environment variable naming a directory that contains the dataset.
pub const DATA_ROOT_ENV: &str = "CFT_DATA_ROOT";

/// Where a discovered path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// `--data=PATH`.
    Cli,
    /// `CFT_TRAJECTORY_CSV`.
    TrajectoryEnv,
    /// `CFT_DATA_ROOT`.
    DataRootEnv,
    /// `CARGO_MANIFEST_DIR`.
    ManifestDir,
    /// Current working directory.
    WorkingDir,
    /// Nothing existed; CWD candidate returned as-is.
    Fallback,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cli => "--data",
            Self::TrajectoryEnv => TRAJECTORY_ENV,
            Self::DataRootEnv => DATA_ROOT_ENV,
            Self::ManifestDir => "CARGO_MANIFEST_DIR",
            Self::WorkingDir => "working directory",
            Self::Fallback => "fallback (not found)",
        };
        f.write_str(s)
    }
}

/// Everything discovery looks at.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryInputs {
    /// Explicit path from the command line.
    pub cli: Option<PathBuf>,
    /// Value of `CFT_TRAJECTORY_CSV`.
    pub trajectory_env: Option<PathBuf>,
    /// Value of `CFT_DATA_ROOT`.
    pub root_env: Option<PathBuf>,
    /// Crate manifest directory.
    pub manifest_dir: Option<PathBuf>,
    /// Current working directory.
    pub cwd: Option<PathBuf>,
}

/// A resolved dataset path and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// Path to read.
    pub path: PathBuf,
    /// Which rule produced it.
    pub source: DiscoverySource,
}

impl DiscoveryInputs {
    /// Gather inputs from the process environment.
    #[must_use]
    pub fn from_env(cli: Option<&Path>) -> Self {
        Self {
            cli: cli.map(Path::to_path_buf),
            trajectory_env: std::env::var_os(TRAJECTORY_ENV).map(PathBuf::from),
            root_env: std::env::var_os(DATA_ROOT_ENV).map(PathBuf::from),
            manifest_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
            cwd: std::env::current_dir().ok(),
        }
    }

    /// Apply the discovery order.
    #[must_use]
    pub fn resolve(&self) -> Discovered {
        let candidates = [
            (self.cli.clone(), DiscoverySource::Cli),
            (self.trajectory_env.clone(), DiscoverySource::TrajectoryEnv),
            (
                self.root_env.as_ref().map(|d| d.join(TRAJECTORY_FILE)),
                DiscoverySource::DataRootEnv,
            ),
            (
                self.manifest_dir.as_ref().map(|d| d.join(TRAJECTORY_FILE)),
                DiscoverySource::ManifestDir,
            ),
            (self.cwd_candidate(), DiscoverySource::WorkingDir),
        ];
        for (path, source) in candidates {
            if let Some(path) = path {
                if path.is_file() {
                    debug!(path = %path.display(), %source, "dataset discovered");
                    return Discovered { path, source };
                }
                debug!(path = %path.display(), %source, "candidate missing");
            }
        }
        Discovered {
            path: self
                .cwd_candidate()
                .unwrap_or_else(|| PathBuf::from(TRAJECTORY_FILE)),
            source: DiscoverySource::Fallback,
        }
    }

    fn cwd_candidate(&self) -> Option<PathBuf> {
        self.cwd.as_ref().map(|d| d.join(TRAJECTORY_FILE))
    }
}

/// Discover the dataset path from the process environment.
#[must_use]
pub fn discover_trajectory(cli: Option<&Path>) -> PathBuf {
    DiscoveryInputs::from_env(cli).resolve().path
}
