mod reports;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::config::Secrets;
use crate::pipeline::ReportPipeline;

pub use reports::{EMPTY_RESULT_WARNING, ReportResponse, ReportService};

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub reports: ReportService,
}

impl AppServices {
    pub fn new(config: &AppConfig, secrets: Secrets) -> Self {
        let pipeline = ReportPipeline::new(Arc::new(secrets), config.storage.clone());
        Self {
            reports: ReportService::new(pipeline),
        }
    }
}
