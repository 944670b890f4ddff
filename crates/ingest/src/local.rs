use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::store::ObjectStore;
use crate::types::{IngestError, Result};

/// Directory-backed store: bucket `b` lives at `<root>/b` and object keys are
/// `/`-separated paths below it.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Err(IngestError::Storage(format!(
                "bucket '{}' does not exist under {}",
                bucket,
                self.root.display()
            )));
        }
        Ok(dir)
    }
}

fn key_for(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts = relative
        .components()
        .map(|part| part.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

impl ObjectStore for LocalStore {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_dir = self.bucket_dir(bucket)?;
        let start = prefix
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or_default()
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(bucket_dir.clone(), |path, part| path.join(part));
        if !start.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in WalkDir::new(&start).follow_links(false) {
            let entry = entry.map_err(|err| IngestError::Storage(err.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = key_for(&bucket_dir, entry.path()) else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let bucket_dir = self.bucket_dir(bucket)?;
        let path = key
            .split('/')
            .fold(bucket_dir, |path, part| path.join(part));
        fs::read(&path).map_err(|err| {
            IngestError::Storage(format!("read {}/{}: {}", bucket, key, err))
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
