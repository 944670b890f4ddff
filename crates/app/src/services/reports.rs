use std::sync::Arc;

use report_core::{ExpandedRecord, ReportTable, ReportType};
use tracing::{info, warn};

use crate::cache::ReportCache;
use crate::error::{ApiError, AppError, Result};
use crate::pipeline::ReportLoader;

pub const EMPTY_RESULT_WARNING: &str =
    "No data loaded. Please check the S3 bucket and file paths.";

/// Outcome of a report load as handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct ReportResponse {
    pub table: Option<Arc<ReportTable>>,
    pub error: Option<ApiError>,
}

impl ReportResponse {
    fn failed(err: AppError) -> Self {
        Self {
            table: None,
            error: Some(err.into()),
        }
    }

    pub fn rows(&self) -> &[ExpandedRecord] {
        self.table
            .as_deref()
            .map(|table| table.rows.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Warning to show in place of an empty table.
    pub fn warning(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_RESULT_WARNING)
    }
}

#[derive(Clone)]
pub struct ReportService {
    cache: Arc<ReportCache>,
}

impl ReportService {
    pub fn new(loader: impl ReportLoader + 'static) -> Self {
        Self {
            cache: Arc::new(ReportCache::new(loader)),
        }
    }

    pub fn try_load(&self, report_type: ReportType) -> Result<Arc<ReportTable>> {
        self.cache.load(report_type)
    }

    /// Loads the expanded table for `report_type` ("Weekly" or "Monthly").
    ///
    /// Never fails: any error yields an empty response carrying the message.
    /// Blocks the calling thread while storage is read. Async callers should
    /// go through `spawn_blocking`; the S3 backend reports an error when
    /// driven from a runtime thread.
    pub fn load_data_from_s3(&self, report_type: &str) -> ReportResponse {
        let parsed = match report_type.parse::<ReportType>() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(report_type, "rejected report type");
                return ReportResponse::failed(AppError::InvalidInput(err.to_string()));
            }
        };
        match self.try_load(parsed) {
            Ok(table) => ReportResponse {
                table: Some(table),
                error: None,
            },
            Err(err) => {
                warn!(report_type = %parsed, error = %err, "report load failed");
                ReportResponse::failed(err)
            }
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("report data will be reloaded on next request");
    }

    pub fn cached(&self, report_type: ReportType) -> Option<Arc<ReportTable>> {
        self.cache.peek(report_type)
    }
}
