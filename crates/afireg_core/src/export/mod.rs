//! Spreadsheet-compatible report export.
//!
//! # Responsibility
//! - Write the consolidated export dataset to a CSV file.
//!
//! # Invariants
//! - An empty dataset produces no file.
//! - The header row comes from the `ExportRow` serialized field names.

use crate::repo::participation_repo::ExportRow;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Result of an export attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { rows: usize },
    NothingToExport,
}

/// Writes the dataset to `path` as CSV.
///
/// Returns [`ExportOutcome::NothingToExport`] without touching the
/// filesystem when `rows` is empty.
pub fn export_to_csv(path: impl AsRef<Path>, rows: &[ExportRow]) -> ExportResult<ExportOutcome> {
    if rows.is_empty() {
        info!("event=export module=export status=skipped reason=no_rows");
        return Ok(ExportOutcome::NothingToExport);
    }

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(
        "event=export module=export status=ok rows={} path={}",
        rows.len(),
        path.as_ref().display()
    );
    Ok(ExportOutcome::Written { rows: rows.len() })
}
