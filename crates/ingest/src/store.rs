use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::types::{IngestError, Result};

/// Read-only access to a bucketed object store.
pub trait ObjectStore: Send + Sync {
    /// Keys in `bucket` starting with `prefix`, in any order.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    fn backend_name(&self) -> &'static str;
}

impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        (**self).list(bucket, prefix)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        (**self).get(bucket, key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Object store held entirely in memory. Counts requests so callers can
/// tell whether a read actually reached storage.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    list_requests: AtomicUsize,
    get_requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bucket.to_string(), key.to_string()), content.into());
    }

    pub fn remove(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(bucket.to_string(), key.to_string()))
            .is_some()
    }

    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    pub fn get_requests(&self) -> usize {
        self.get_requests.load(Ordering::SeqCst)
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        self.list_requests.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        if !objects.keys().any(|(name, _)| name == bucket) {
            return Err(IngestError::Storage(format!(
                "bucket '{}' does not exist",
                bucket
            )));
        }
        Ok(objects
            .keys()
            .filter(|(name, key)| name == bucket && key.starts_with(prefix))
            .map(|(_, key)| key.clone())
            .collect())
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.get_requests.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| IngestError::Storage(format!("object not found: {}/{}", bucket, key)))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
