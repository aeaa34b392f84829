//! CSV snapshots of the hosted tables, used to seed the in-memory store for the CLI and demo
//! server.
//!
//! Inventory columns: `blood_type,quantity,capacity,updated_at` (timestamp optional, RFC 3339
//! or `YYYY-MM-DD`). Request columns: `blood_type,quantity,status,user_id` (status defaults to
//! pending, user optional).

mod parser;

use chrono::Utc;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::eligibility::{BloodRequestRecord, BloodTypeRecord};
use parser::RowError;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    InvalidTimestamp { line: usize, value: String },
    InvalidStatus { line: usize, value: String },
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io { path, source } => {
                write!(f, "failed to read snapshot {}: {}", path.display(), source)
            }
            SnapshotImportError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
            SnapshotImportError::InvalidTimestamp { line, value } => {
                write!(f, "line {line}: '{value}' is not an RFC 3339 timestamp or date")
            }
            SnapshotImportError::InvalidStatus { line, value } => {
                write!(f, "line {line}: unknown request status '{value}'")
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io { source, .. } => Some(source),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::InvalidTimestamp { .. }
            | SnapshotImportError::InvalidStatus { .. } => None,
        }
    }
}

impl From<RowError> for SnapshotImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Timestamp { line, value } => Self::InvalidTimestamp { line, value },
            RowError::Status { line, value } => Self::InvalidStatus { line, value },
        }
    }
}

/// Rows without a timestamp are stamped with the load time.
pub fn read_inventory<R: Read>(reader: R) -> Result<Vec<BloodTypeRecord>, SnapshotImportError> {
    let mut records = parser::parse_inventory(reader, Utc::now())?;
    records.sort_by(|left, right| left.blood_type.cmp(&right.blood_type));
    Ok(records)
}

pub fn read_requests<R: Read>(reader: R) -> Result<Vec<BloodRequestRecord>, SnapshotImportError> {
    Ok(parser::parse_requests(reader)?)
}

pub fn load_inventory<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BloodTypeRecord>, SnapshotImportError> {
    read_inventory(open(path.as_ref())?)
}

pub fn load_requests<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BloodRequestRecord>, SnapshotImportError> {
    read_requests(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<std::fs::File, SnapshotImportError> {
    std::fs::File::open(path).map_err(|source| SnapshotImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
