use std::time::Instant;

use rayon::prelude::*;
use report_core::{Credentials, EmployeeRecord, ReconciledRecord, UsageRecord};
use report_db::Db;
use tracing::{debug, info};

use crate::csv_file::CsvFile;
use crate::paths::ObjectGlob;
use crate::s3::S3Store;
use crate::store::ObjectStore;
use crate::types::{IngestError, LoadStats, Result};

/// Options for the S3 connection beyond the credentials themselves.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub endpoint_url: Option<String>,
}

/// Query session with object storage access. One per pipeline run.
pub struct Session {
    bucket: String,
    store: Box<dyn ObjectStore>,
    db: Db,
}

/// Files matched by one glob read, parsed and ordered by key.
#[derive(Debug, Clone, Default)]
pub struct CsvScan {
    pub files: Vec<CsvFile>,
    pub stats: LoadStats,
}

impl CsvScan {
    /// Projects every file onto `columns` and concatenates the rows.
    pub fn project(&self, columns: &[&str]) -> Result<Vec<Vec<Option<String>>>> {
        let mut rows = Vec::with_capacity(self.stats.rows_read);
        for file in &self.files {
            rows.extend(file.project(columns)?);
        }
        Ok(rows)
    }
}

impl Session {
    /// Opens a fresh in-memory session reading from S3 with `credentials`.
    pub fn connect(credentials: &Credentials, options: &ConnectOptions) -> Result<Self> {
        let store = S3Store::new(credentials, options.endpoint_url.as_deref())?;
        Self::with_store(&credentials.bucket, Box::new(store))
    }

    /// Opens a fresh in-memory session over an arbitrary store.
    pub fn with_store(bucket: &str, store: Box<dyn ObjectStore>) -> Result<Self> {
        let db = Db::open_in_memory()?;
        debug!(bucket, backend = store.backend_name(), "session opened");
        Ok(Self {
            bucket: bucket.to_string(),
            store,
            db,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Reads every object matching `glob` as CSV with a header line.
    ///
    /// Objects are fetched in key order; parsing runs in parallel. Any failed
    /// fetch or parse fails the whole read, as does a glob matching nothing.
    pub fn read_csv(&self, glob: &ObjectGlob) -> Result<CsvScan> {
        let start = Instant::now();
        let mut keys = self
            .store
            .list(glob.bucket(), glob.list_prefix())?
            .into_iter()
            .filter(|key| glob.matches(key))
            .collect::<Vec<_>>();
        keys.sort();
        if keys.is_empty() {
            return Err(IngestError::NoFilesFound {
                pattern: glob.to_string(),
            });
        }

        let mut fetched = Vec::with_capacity(keys.len());
        for key in keys {
            let bytes = self.store.get(glob.bucket(), &key)?;
            fetched.push((key, bytes));
        }
        let bytes_read = fetched
            .iter()
            .map(|(_, bytes)| bytes.len() as u64)
            .sum::<u64>();

        let files = fetched
            .par_iter()
            .map(|(key, bytes)| CsvFile::parse(key, bytes))
            .collect::<Result<Vec<_>>>()?;
        let stats = LoadStats {
            files_read: files.len(),
            rows_read: files.iter().map(|file| file.rows.len()).sum(),
            bytes_read,
        };
        info!(
            pattern = %glob,
            files = stats.files_read,
            rows = stats.rows_read,
            bytes = stats.bytes_read,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "read csv objects"
        );
        Ok(CsvScan { files, stats })
    }

    /// Registers both tables in the session and full-outer-joins them.
    pub fn reconcile(
        &mut self,
        employees: &[EmployeeRecord],
        usage: &[UsageRecord],
    ) -> Result<Vec<ReconciledRecord>> {
        Ok(self.db.reconcile_records(employees, usage)?)
    }
}
