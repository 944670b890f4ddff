use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use ingest::{ConnectOptions, LocalStore, ObjectStore, Session, load_roster, load_usage};
use report_core::{ReportTable, ReportType, expand_model_usage};
use tracing::info;

use crate::config::{Secrets, StorageBackend};
use crate::error::{AppError, Result};

pub const TIMING_ENV: &str = "REPORT_PIPELINE_TIMING";

/// Produces the final table for a report type.
pub trait ReportLoader: Send + Sync {
    fn load(&self, report_type: ReportType) -> Result<ReportTable>;
}

impl<T: ReportLoader + ?Sized> ReportLoader for Arc<T> {
    fn load(&self, report_type: ReportType) -> Result<ReportTable> {
        (**self).load(report_type)
    }
}

enum Source {
    Backend(StorageBackend),
    Store(Arc<dyn ObjectStore>),
}

/// Connect, load usage, load roster, reconcile, expand. Every run opens its
/// own session.
pub struct ReportPipeline {
    secrets: Arc<Secrets>,
    source: Source,
    timing_enabled: bool,
}

impl ReportPipeline {
    pub fn new(secrets: Arc<Secrets>, storage: StorageBackend) -> Self {
        Self {
            secrets,
            source: Source::Backend(storage),
            timing_enabled: std::env::var(TIMING_ENV).is_ok(),
        }
    }

    /// Reads through `store` instead of a configured backend.
    pub fn with_store(secrets: Arc<Secrets>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            secrets,
            source: Source::Store(store),
            timing_enabled: std::env::var(TIMING_ENV).is_ok(),
        }
    }

    fn connect(&self) -> Result<Session> {
        let credentials = self.secrets.credentials()?;
        let session = match &self.source {
            Source::Backend(StorageBackend::S3 { endpoint_url }) => {
                let options = ConnectOptions {
                    endpoint_url: endpoint_url.clone(),
                };
                Session::connect(&credentials, &options)
            }
            Source::Backend(StorageBackend::Local { root }) => {
                Session::with_store(&credentials.bucket, Box::new(LocalStore::new(root)))
            }
            Source::Store(store) => Session::with_store(&credentials.bucket, Box::new(store.clone())),
        };
        Ok(session?)
    }

    pub fn run(&self, report_type: ReportType) -> Result<ReportTable> {
        let start = Instant::now();
        let mut session = self.connect()?;
        let connected = start.elapsed();

        let usage = load_usage(&session, report_type).map_err(|source| AppError::SourceRead {
            context: format!(
                "could not read usage files from folder '{}'",
                report_type.folder()
            ),
            source,
        })?;
        let usage_loaded = start.elapsed();

        let employees = load_roster(&session).map_err(|source| AppError::SourceRead {
            context: "could not read the employee info files".to_string(),
            source,
        })?;
        let roster_loaded = start.elapsed();

        let reconciled = session.reconcile(&employees, &usage)?;
        let reconciled_count = reconciled.len();
        let rows = expand_model_usage(reconciled);

        info!(
            report_type = %report_type,
            backend = session.backend_name(),
            usage = usage.len(),
            employees = employees.len(),
            reconciled = reconciled_count,
            rows = rows.len(),
            "report pipeline finished"
        );
        if self.timing_enabled {
            info!(
                connect_ms = connected.as_millis() as u64,
                usage_ms = (usage_loaded - connected).as_millis() as u64,
                roster_ms = (roster_loaded - usage_loaded).as_millis() as u64,
                total_ms = start.elapsed().as_millis() as u64,
                "report pipeline timing"
            );
        }

        let loaded_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(ReportTable::new(report_type, loaded_at, rows))
    }
}

impl ReportLoader for ReportPipeline {
    fn load(&self, report_type: ReportType) -> Result<ReportTable> {
        self.run(report_type)
    }
}
