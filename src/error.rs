// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for trajectory loading and CFT analysis.
//!
//! Check *failures* are not errors: they are recorded in the
//! [`ValidationHarness`](crate::validation::ValidationHarness). Errors are
//! reserved for a table that cannot be read or analysed at all.

use std::fmt;
use std::path::PathBuf;

use crate::checks::crooks::Direction;

/// Errors arising from reading, parsing, or analysing a trajectory table.
#[derive(Debug)]
pub enum CftError {
    /// File I/O error with path context.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file contains no header row.
    EmptyHeader {
        /// Path of the empty file.
        path: PathBuf,
    },

    /// A data record has more fields than the header.
    MalformedRecord {
        /// 1-based line number in the file.
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of fields found on the line.
        found: usize,
    },

    /// A required column is absent from the header.
    MissingColumn(String),

    /// A cell that must hold a number is missing or non-numeric.
    InvalidValue {
        /// 1-based line number in the file.
        line: usize,
        /// Column name.
        column: String,
        /// Raw cell contents.
        value: String,
    },

    /// No rows were selected for one protocol direction.
    EmptySubset(Direction),

    /// Invalid input to an analysis routine (bin count, non-finite range).
    InvalidInput(String),

    /// The machine-readable report could not be serialized or written.
    Report(String),
}

/// Result type alias for CFT validation operations.
pub type Result<T> = std::result::Result<T, CftError>;

impl fmt::Display for CftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::EmptyHeader { path } => write!(f, "{}: no header row", path.display()),
            Self::MalformedRecord {
                line,
                expected,
                found,
            } => write!(
                f,
                "malformed record at line {line}: expected at most {expected} fields, found {found}"
            ),
            Self::MissingColumn(name) => write!(f, "required column '{name}' not in header"),
            Self::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "invalid value at line {line}, column '{column}': '{value}' is not a number"
            ),
            Self::EmptySubset(direction) => {
                write!(f, "no {direction} rows: cannot build a work histogram")
            }
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Report(msg) => write!(f, "report error: {msg}"),
        }
    }
}

impl std::error::Error for CftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::EmptyHeader { .. }
            | Self::MalformedRecord { .. }
            | Self::MissingColumn(_)
            | Self::InvalidValue { .. }
            | Self::EmptySubset(_)
            | Self::InvalidInput(_)
            | Self::Report(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io_error() {
        let err = CftError::Io {
            path: PathBuf::from("data/trajectory.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("trajectory.csv"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn display_malformed_record() {
        let err = CftError::MalformedRecord {
            line: 7,
            expected: 1003,
            found: 1004,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("1003"));
        assert!(msg.contains("1004"));
    }

    #[test]
    fn display_empty_subset_names_direction() {
        let err = CftError::EmptySubset(Direction::Backward);
        assert!(err.to_string().contains("backward"), "{err}");
    }

    #[test]
    fn display_all_prefixes() {
        let cases: Vec<(CftError, &str)> = vec![
            (CftError::MissingColumn("w".into()), "required column 'w'"),
            (
                CftError::InvalidValue {
                    line: 3,
                    column: "isForward".into(),
                    value: "yes".into(),
                },
                "invalid value at line 3",
            ),
            (CftError::InvalidInput("zero bins".into()), "invalid input"),
            (CftError::Report("disk full".into()), "report error"),
        ];
        for (err, expected_prefix) in cases {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "'{msg}' should start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn error_source_chain() {
        let io_err = CftError::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("inner"),
        };
        assert!(std::error::Error::source(&io_err).is_some());

        let parse_err = CftError::MissingColumn("w".into());
        assert!(std::error::Error::source(&parse_err).is_none());
    }
}
