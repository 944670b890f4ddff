mod csv_file;
mod local;
mod paths;
mod roster;
mod s3;
mod session;
mod store;
mod types;
mod usage;

pub use csv_file::CsvFile;
pub use local::LocalStore;
pub use paths::{ObjectGlob, ROSTER_FOLDER, roster_glob, usage_glob};
pub use roster::{ROSTER_COLUMNS, load_roster};
pub use s3::S3Store;
pub use session::{ConnectOptions, CsvScan, Session};
pub use store::{MemoryStore, ObjectStore};
pub use types::{IngestError, LoadStats, Result};
pub use usage::{USAGE_COLUMNS, load_usage};
