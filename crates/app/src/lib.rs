pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod services;

pub use app::{AppConfig, AppState};
pub use cache::ReportCache;
pub use config::{Secrets, StorageBackend, default_secrets_path};
pub use error::{ApiError, AppError, Result};
pub use logging::init_tracing;
pub use pipeline::{ReportLoader, ReportPipeline};
pub use services::{AppServices, EMPTY_RESULT_WARNING, ReportResponse, ReportService};
