//! Loading listings from a newline-delimited JSON (JSONL) file.
//!
//! Each non-blank line is one JSON document. Blank lines are skipped. The
//! first malformed line aborts the whole load. Records keep the exact text of
//! their line, minus surrounding whitespace.

use crate::api::Record;
use log::debug;
use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Errors that can occur while loading a JSONL file.
#[derive(Debug)]
pub enum LoadError {
    /// The input file does not exist
    NotFound(PathBuf),
    /// I/O error reading the input file
    Io(PathBuf, io::Error),
    /// A non-blank line is not valid JSON
    Parse {
        /// 1-based line number
        line: usize,
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The file contained no records
    Empty(PathBuf),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => {
                write!(f, "JSONL file not found: {}", path.display())
            }
            LoadError::Io(path, err) => {
                write!(f, "Failed to read {}: {err}", path.display())
            }
            LoadError::Parse { line, path, source } => write!(
                f,
                "Failed to parse JSONL: Line {line} in {} is not valid JSON: \
                 {source}",
                path.display()
            ),
            LoadError::Empty(path) => write!(
                f,
                "No listings found in {}; aborting.",
                path.display()
            ),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(_, err) => Some(err),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::NotFound(_) | LoadError::Empty(_) => None,
        }
    }
}

/// Read every record from the JSONL file at `path`.
///
/// The file is read to completion and closed before this returns.
pub fn load(path: &Path) -> Result<Vec<Record>, LoadError> {
    debug!("Reading listings from: {}", path.display());
    let file = match File::open(path) {
        Ok(file) => file,
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(err) => return Err(LoadError::Io(path.to_path_buf(), err)),
    };

    from_reader(BufReader::new(file), path)
}

/// Parse JSONL from any buffered reader. `path` is only used for error
/// reporting.
pub fn from_reader<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<Record>, LoadError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| LoadError::Io(path.to_path_buf(), err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = serde_json::from_str::<Record>(line).map_err(|source| {
            LoadError::Parse {
                line: idx + 1,
                path: path.to_path_buf(),
                source,
            }
        })?;
        records.push(record);
    }

    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

// --- Tests ---
