use std::fmt;

use glob::{MatchOptions, Pattern};
use report_core::ReportType;

use crate::types::{IngestError, Result};

pub const ROSTER_FOLDER: &str = "employee_info";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Glob over object keys inside one bucket, e.g. `weekly/*.csv`.
#[derive(Debug, Clone)]
pub struct ObjectGlob {
    bucket: String,
    pattern: Pattern,
}

impl ObjectGlob {
    pub fn new(bucket: &str, pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|err| {
            IngestError::Storage(format!("invalid object pattern '{}': {}", pattern, err))
        })?;
        Ok(Self {
            bucket: bucket.to_string(),
            pattern,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Literal key prefix before the first wildcard, used to narrow listings.
    pub fn list_prefix(&self) -> &str {
        let text = self.pattern.as_str();
        let end = text.find(['*', '?', '[']).unwrap_or(text.len());
        &text[..end]
    }

    pub fn matches(&self, key: &str) -> bool {
        self.pattern.matches_with(key, MATCH_OPTIONS)
    }
}

impl fmt::Display for ObjectGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.pattern.as_str())
    }
}

pub fn usage_glob(bucket: &str, report_type: ReportType) -> Result<ObjectGlob> {
    ObjectGlob::new(bucket, &format!("{}/*.csv", report_type.folder()))
}

pub fn roster_glob(bucket: &str) -> Result<ObjectGlob> {
    ObjectGlob::new(bucket, &format!("{}/*.csv", ROSTER_FOLDER))
}
