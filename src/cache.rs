use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;

use crate::data::loader::{load_file_with, LoadOptions};
use crate::data::model::SalesTable;

/// Memoized loader: each path is read once and shared afterwards.
///
/// Failed loads are not remembered, so a fixed file can be retried.
#[derive(Debug, Default)]
pub struct DatasetCache {
    options: LoadOptions,
    tables: Mutex<HashMap<PathBuf, Arc<SalesTable>>>,
}

impl DatasetCache {
    pub fn new(options: LoadOptions) -> Self {
        DatasetCache {
            options,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<SalesTable>> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = tables.get(path) {
            log::debug!("Using cached dataset for {}", path.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file_with(path, &self.options)?);
        tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Forget the table for `path`; the next access reloads it.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables
            .lock()
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
    use tempfile::TempDir;

    const CSV: &str = "Tanggal,Kategori,Nama_Item,Jumlah,Total_Penjualan\n\
                       2024-01-01,Coffee,Latte,2,50000\n";

    #[test]
    fn test_second_access_is_shared() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = DatasetCache::default();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");

        let cache = DatasetCache::default();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_invalidate_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = DatasetCache::default();
        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}
