use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use super::error::{DataError, Result};
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// FileSignature – what "unchanged" means for a source file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(FileSignature {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CacheEntry {
    signature: FileSignature,
    dataset: Arc<Dataset>,
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// Loaded datasets keyed on path, revalidated against the file signature on
/// every lookup. Safe to share between threads.
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, loading it if it is not cached or the
    /// file changed since it was cached.
    pub fn get(&self, path: &Path) -> Result<Arc<Dataset>> {
        let signature = FileSignature::of(path)?;

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(path) {
                if entry.signature == signature {
                    log::debug!("Cache hit for {}", path.display());
                    return Ok(Arc::clone(&entry.dataset));
                }
                log::debug!("{} changed on disk, reloading", path.display());
            }
        }

        let dataset = Arc::new(load_file(path)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            path.to_path_buf(),
            CacheEntry {
                signature,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&self, path: &Path) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some();
        if removed {
            log::debug!("Invalidated cache entry for {}", path.display());
        }
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether `path` is cached and its file is unchanged.
    pub fn contains_fresh(&self, path: &Path) -> bool {
        let Ok(signature) = FileSignature::of(path) else {
            return false;
        };
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .is_some_and(|e| e.signature == signature)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "year,month,day,station,PM2.5,PM10,TEMP,PRES,DEWP,RAIN\n\
                       2015,6,1,Tiantan,20,40,25,1001,10,0\n";

    fn fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "enviro-insights-cache-{}-{name}.csv",
            std::process::id()
        ));
        std::fs::write(&path, CSV).unwrap();
        path
    }

    #[test]
    fn unchanged_file_is_served_from_cache() {
        let path = fixture("hit");
        let cache = DatasetCache::new();
        let first = cache.get(&path).unwrap();
        let second = cache.get(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains_fresh(&path));
        assert_eq!(cache.len(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn changed_file_is_reloaded() {
        let path = fixture("changed");
        let cache = DatasetCache::new();
        let before = cache.get(&path).unwrap();
        assert_eq!(before.len(), 1);

        std::fs::write(&path, format!("{CSV}2015,6,2,Tiantan,30,50,26,1000,11,0.5\n")).unwrap();
        assert!(!cache.contains_fresh(&path));

        let after = cache.get(&path).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn invalidate_forces_reload() {
        let path = fixture("invalidate");
        let cache = DatasetCache::new();
        let first = cache.get(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        assert!(cache.is_empty());

        let second = cache.get(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);

        cache.clear();
        assert!(cache.is_empty());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn failed_load_is_not_cached() {
        let path = std::env::temp_dir().join(format!(
            "enviro-insights-cache-{}-bad.csv",
            std::process::id()
        ));
        std::fs::write(&path, "year,month\n2015,6\n").unwrap();
        let cache = DatasetCache::new();
        assert!(matches!(cache.get(&path), Err(DataError::Schema { .. })));
        assert!(cache.is_empty());
        std::fs::remove_file(path).ok();
    }
}
