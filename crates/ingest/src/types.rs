use serde::Serialize;
use std::io;

/// Summary of one glob read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub files_read: usize,
    pub rows_read: usize,
    pub bytes_read: u64,
}

/// Errors emitted while reading remote CSV sources.
#[derive(Debug)]
pub enum IngestError {
    Io(io::Error),
    Storage(String),
    NoFilesFound { pattern: String },
    Csv { file: String, source: csv::Error },
    MissingColumn { file: String, column: String },
    Db(report_db::DbError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Storage(message) => write!(f, "storage error: {}", message),
            Self::NoFilesFound { pattern } => {
                write!(f, "no files found that match the pattern \"{}\"", pattern)
            }
            Self::Csv { file, source } => write!(f, "malformed csv in {}: {}", file, source),
            Self::MissingColumn { file, column } => {
                write!(f, "column \"{}\" not found in {}", column, file)
            }
            Self::Db(err) => write!(f, "db error: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<report_db::DbError> for IngestError {
    fn from(err: report_db::DbError) -> Self {
        Self::Db(err)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
