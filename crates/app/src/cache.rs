use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use report_core::{ReportTable, ReportType};
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::ReportLoader;

type Slot = Arc<Mutex<Option<Arc<ReportTable>>>>;

/// Memoizes loader results per report type until `clear` is called.
///
/// Concurrent loads of the same uncached report type run the loader once;
/// the other callers wait on that key's slot and share the result. Failed
/// loads are not stored.
pub struct ReportCache {
    loader: Box<dyn ReportLoader>,
    slots: Mutex<HashMap<ReportType, Slot>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReportCache {
    pub fn new(loader: impl ReportLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(&self, report_type: ReportType) -> Result<Arc<ReportTable>> {
        let slot = lock(&self.slots).entry(report_type).or_default().clone();
        let mut entry = lock(&slot);
        if let Some(table) = entry.as_ref() {
            debug!(report_type = %report_type, "report cache hit");
            return Ok(table.clone());
        }
        debug!(report_type = %report_type, "report cache miss");
        let table = Arc::new(self.loader.load(report_type)?);
        *entry = Some(table.clone());
        Ok(table)
    }

    /// Returns the stored table without loading.
    pub fn peek(&self, report_type: ReportType) -> Option<Arc<ReportTable>> {
        let slot = lock(&self.slots).get(&report_type).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    /// Evicts every entry. Loads already in flight finish but are not kept.
    pub fn clear(&self) {
        let evicted = {
            let mut slots = lock(&self.slots);
            let count = slots.len();
            slots.clear();
            count
        };
        info!(evicted, "report cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::error::AppError;

    #[derive(Default)]
    struct SpyLoader {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    impl SpyLoader {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ReportLoader for SpyLoader {
        fn load(&self, report_type: ReportType) -> Result<ReportTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            if self.fail {
                return Err(AppError::Config("boom".to_string()));
            }
            Ok(ReportTable::new(
                report_type,
                "2025-01-01T00:00:00.000Z".to_string(),
                Vec::new(),
            ))
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let spy = Arc::new(SpyLoader::default());
        let cache = ReportCache::new(spy.clone());

        let first = cache.load(ReportType::Weekly).expect("first load");
        let second = cache.load(ReportType::Weekly).expect("second load");

        assert_eq!(spy.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clear_forces_exactly_one_more_load() {
        let spy = Arc::new(SpyLoader::default());
        let cache = ReportCache::new(spy.clone());

        cache.load(ReportType::Weekly).expect("first load");
        cache.clear();
        cache.load(ReportType::Weekly).expect("reload");
        cache.load(ReportType::Weekly).expect("cached again");

        assert_eq!(spy.calls(), 2);
    }

    #[test]
    fn keys_are_cached_independently() {
        let spy = Arc::new(SpyLoader::default());
        let cache = ReportCache::new(spy.clone());

        cache.load(ReportType::Weekly).expect("weekly");
        cache.load(ReportType::Monthly).expect("monthly");
        cache.load(ReportType::Monthly).expect("monthly cached");

        assert_eq!(spy.calls(), 2);
        assert!(cache.peek(ReportType::Weekly).is_some());
        cache.clear();
        assert!(cache.peek(ReportType::Weekly).is_none());
        assert!(cache.peek(ReportType::Monthly).is_none());
    }

    #[test]
    fn failures_are_not_cached() {
        let spy = Arc::new(SpyLoader {
            fail: true,
            ..SpyLoader::default()
        });
        let cache = ReportCache::new(spy.clone());

        assert!(cache.load(ReportType::Weekly).is_err());
        assert!(cache.load(ReportType::Weekly).is_err());

        assert_eq!(spy.calls(), 2);
        assert!(cache.peek(ReportType::Weekly).is_none());
    }

    #[test]
    fn concurrent_first_loads_share_one_run() {
        let spy = Arc::new(SpyLoader {
            delay: Some(Duration::from_millis(50)),
            ..SpyLoader::default()
        });
        let cache = Arc::new(ReportCache::new(spy.clone()));
        let barrier = Arc::new(Barrier::new(4));

        let handles = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache.load(ReportType::Monthly).expect("load")
                })
            })
            .collect::<Vec<_>>();
        let tables = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect::<Vec<_>>();

        assert_eq!(spy.calls(), 1);
        assert!(tables.iter().all(|table| Arc::ptr_eq(table, &tables[0])));
    }
}
