use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::loader::load_file;
use super::model::Dataset;
use crate::error::DataResult;

// ---------------------------------------------------------------------------
// DatasetCache – load-once handle for a single source
// ---------------------------------------------------------------------------

/// Owns the dataset read from one source path.
///
/// The first successful [`get`](DatasetCache::get) parses the file; every
/// later call returns the same `Arc`. Concurrent first calls block on the
/// same initialisation, so at most one parse runs. A failed load leaves the
/// slot empty and the next call tries again.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    slot: OnceCell<Arc<Dataset>>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        DatasetCache {
            source: source.into(),
            slot: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Source path, which is also the cache key.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get(&self) -> DataResult<Arc<Dataset>> {
        if let Some(ds) = self.slot.get() {
            log::debug!("Dataset cache hit for {}", self.source.display());
            return Ok(Arc::clone(ds));
        }
        self.slot
            .get_or_try_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                load_file(&self.source).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// The dataset if it has already been loaded.
    pub fn peek(&self) -> Option<Arc<Dataset>> {
        self.slot.get().cloned()
    }

    /// Number of parses that actually ran (successful or not).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_not_cached() {
        let cache = DatasetCache::new("does/not/exist.csv");
        assert!(cache.get().unwrap_err().is_not_found());
        assert!(cache.get().unwrap_err().is_not_found());
        assert_eq!(cache.load_count(), 2);
        assert!(cache.peek().is_none());
    }

    #[test]
    fn cache_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DatasetCache>();
    }
}
