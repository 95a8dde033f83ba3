// SPDX-License-Identifier: AGPL-3.0-only

//! Streaming reader for the trajectory table.
//!
//! Streams from disk via `BufReader`; the 20,000 × 1003 table is never
//! materialised. Each check opens its own reader and folds over records.
//!
//! Format:
//! ```text
//! x_0,x_1,…,x_1000,w,isForward      header (required)
//! 0.13,0.09,…,4.87,3.21,1           one trajectory per line
//! ```
//!
//! Blank lines are skipped. Fields may be double-quoted (`""` escapes a
//! quote) but must not contain line breaks. A record shorter than the
//! header is padded with missing cells; a longer one is an error.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CftError, Result};

/// Column holding the work performed on each trajectory.
pub const WORK_COLUMN: &str = "w";

/// Column holding the protocol direction indicator (1 forward, 0 backward).
pub const DIRECTION_COLUMN: &str = "isForward";

/// Cell contents treated as missing, in addition to the empty cell.
///
/// The conventional NA spellings of dataframe libraries, so that a table
/// that loads with no NaNs elsewhere also reports none here.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell counts as a missing value.
#[must_use]
pub fn is_missing(field: &str) -> bool {
    let t = field.trim();
    t.is_empty() || NA_TOKENS.contains(&t)
}

/// Split one CSV line into fields.
///
/// Unquoted lines (the common case for numeric tables) borrow from the
/// input without allocating per field.
#[must_use]
pub fn split_fields(line: &str) -> Vec<Cow<'_, str>> {
    if !line.contains('"') {
        return line.split(',').map(Cow::Borrowed).collect();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(Cow::Owned(std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    fields.push(Cow::Owned(current));
    fields
}

/// One data record, borrowed from the reader's line buffer.
#[derive(Debug)]
pub struct Record<'a> {
    /// 1-based line number in the file.
    pub line: usize,
    fields: Vec<Cow<'a, str>>,
}

impl Record<'_> {
    /// Number of fields present on the line (may be fewer than the header).
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw cell at `index`, or `None` if the record is shorter.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(AsRef::as_ref)
    }

    /// Iterate over the raw cells present on the line.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(AsRef::as_ref)
    }

    /// Parse the cell at `index` as a number.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::InvalidValue`] if the cell is absent, missing, or
    /// not a number.
    pub fn number(&self, index: usize, column: &str) -> Result<f64> {
        let raw = self.get(index).unwrap_or("");
        let invalid = || CftError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: raw.to_string(),
        };
        if is_missing(raw) {
            return Err(invalid());
        }
        raw.trim().parse::<f64>().map_err(|_| invalid())
    }
}

/// Streaming reader over a trajectory CSV file.
#[derive(Debug)]
pub struct TrajectoryReader {
    path: PathBuf,
    reader: BufReader<File>,
    header: Vec<String>,
    line: String,
    line_no: usize,
}

impl TrajectoryReader {
    /// Open `path` and read its header row.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::Io`] if the file cannot be opened or read, and
    /// [`CftError::EmptyHeader`] if it contains no non-blank line.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            header: Vec::new(),
            line: String::new(),
            line_no: 0,
        };
        if !reader.read_nonblank_line()? {
            return Err(CftError::EmptyHeader {
                path: path.to_path_buf(),
            });
        }
        reader.header = split_fields(&reader.line)
            .iter()
            .map(|f| f.trim().to_string())
            .collect();
        debug!(
            path = %path.display(),
            columns = reader.header.len(),
            "opened trajectory table"
        );
        Ok(reader)
    }

    /// Path this reader was opened on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names from the header row.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of columns declared by the header.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Index of the first column named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::MissingColumn`] if no header field matches.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CftError::MissingColumn(name.to_string()))
    }

    /// Read the next data record, or `None` at end of file.
    ///
    /// # Errors
    ///
    /// Returns [`CftError::Io`] on a read failure and
    /// [`CftError::MalformedRecord`] if the line has more fields than the
    /// header.
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>> {
        if !self.read_nonblank_line()? {
            return Ok(None);
        }
        let line = self.line_no;
        let fields = split_fields(&self.line);
        if fields.len() > self.header.len() {
            return Err(CftError::MalformedRecord {
                line,
                expected: self.header.len(),
                found: fields.len(),
            });
        }
        Ok(Some(Record { line, fields }))
    }

    /// Load the next non-blank line into the buffer, without its line ending.
    fn read_nonblank_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .map_err(|source| CftError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Ok(false);
            }
            self.line_no += 1;
            let content_len = self.line.trim_end_matches(['\n', '\r']).len();
            self.line.truncate(content_len);
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_tokens() {
        for t in ["", "  ", "NaN", "nan", "NA", "N/A", "null", "None", " <NA> "] {
            assert!(is_missing(t), "'{t}' should be missing");
        }
        for t in ["0", "-1.5", "1e-3", "inf", "x", "NONE"] {
            assert!(!is_missing(t), "'{t}' should not be missing");
        }
    }

    #[test]
    fn split_unquoted_borrows() {
        let fields = split_fields("1.0,,-2.5");
        assert_eq!(fields.len(), 3);
        assert!(matches!(fields[0], Cow::Borrowed("1.0")));
        assert_eq!(fields[1], "");
        assert_eq!(fields[2], "-2.5");
    }

    #[test]
    fn split_quoted_fields() {
        let fields = split_fields(r#""a,b",2,"say ""hi""""#);
        assert_eq!(fields, vec!["a,b", "2", r#"say "hi""#]);
    }

    #[test]
    fn split_trailing_comma_gives_empty_field() {
        assert_eq!(split_fields("1,2,").len(), 3);
    }

    #[test]
    fn reader_streams_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "x_0,w,isForward\r\n0.1,2.5,1\r\n\n0.2,-1,0\n");
        let mut r = TrajectoryReader::open(&path).unwrap();
        assert_eq!(r.header(), ["x_0", "w", "isForward"]);
        assert_eq!(r.column_index(WORK_COLUMN).unwrap(), 1);
        assert_eq!(r.column_index(DIRECTION_COLUMN).unwrap(), 2);

        let rec = r.next_record().unwrap().unwrap();
        assert_eq!(rec.line, 2);
        assert!((rec.number(1, "w").unwrap() - 2.5).abs() < f64::EPSILON);
        let rec = r.next_record().unwrap().unwrap();
        assert_eq!(rec.line, 4, "blank line 3 is skipped but counted");
        assert_eq!(rec.get(2), Some("0"));
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn short_record_has_absent_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "a,b,c\n1,2\n");
        let mut r = TrajectoryReader::open(&path).unwrap();
        let rec = r.next_record().unwrap().unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get(2), None);
        assert!(matches!(
            rec.number(2, "c"),
            Err(CftError::InvalidValue { line: 2, .. })
        ));
    }

    #[test]
    fn long_record_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "a,b\n1,2,3\n");
        let mut r = TrajectoryReader::open(&path).unwrap();
        let err = r.next_record().unwrap_err();
        assert!(matches!(
            err,
            CftError::MalformedRecord {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn empty_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "\n\n");
        assert!(matches!(
            TrajectoryReader::open(&path),
            Err(CftError::EmptyHeader { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        let err = TrajectoryReader::open(Path::new("/nonexistent/trajectory.csv")).unwrap_err();
        assert!(matches!(err, CftError::Io { .. }));
        assert!(err.to_string().contains("trajectory.csv"));
    }

    #[test]
    fn unknown_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "x_0,isForward\n1,1\n");
        let r = TrajectoryReader::open(&path).unwrap();
        assert!(matches!(
            r.column_index(WORK_COLUMN),
            Err(CftError::MissingColumn(name)) if name == "w"
        ));
    }

    #[test]
    fn number_rejects_text_and_na() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", "w,isForward\nabc,NaN\n");
        let mut r = TrajectoryReader::open(&path).unwrap();
        let rec = r.next_record().unwrap().unwrap();
        assert!(rec.number(0, "w").is_err());
        assert!(rec.number(1, "isForward").is_err());
    }
}
