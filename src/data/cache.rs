//! Dataset cache keyed by a fingerprint of the data folder.
//! Reloads when any faction file is added, removed, resized or given a different mtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::data::loader::{list_faction_files, load_faction_files, LoadError};

/// Size and mtime of one faction file at fingerprint time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Per-file stamps in listing order. An mtime moving backwards still counts as a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub files: Vec<FileStamp>,
}

impl Fingerprint {
    pub fn of_files(files: &[PathBuf]) -> Self {
        let files = files
            .iter()
            .map(|path| {
                let meta = fs::metadata(path).ok();
                FileStamp {
                    path: path.clone(),
                    len: meta.as_ref().map_or(0, |m| m.len()),
                    modified: meta.and_then(|m| m.modified().ok()),
                }
            })
            .collect();
        Self { files }
    }

    pub fn of_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::of_files(&list_faction_files(dir)?))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|stamp| stamp.len).sum()
    }
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: Fingerprint,
    dataset: Arc<Dataset>,
}

/// Holds the latest snapshot for one folder. Readers get an `Arc` that stays valid after a
/// reload replaces the cached one.
#[derive(Debug)]
pub struct DatasetCache {
    dir: PathBuf,
    entry: Mutex<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entry: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        let files = list_faction_files(&self.dir)?;
        let fingerprint = Fingerprint::of_files(&files);

        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = entry.as_ref() {
            if cached.fingerprint == fingerprint {
                debug!(dir = %self.dir.display(), "dataset cache hit");
                return Ok(Arc::clone(&cached.dataset));
            }
        }

        debug!(dir = %self.dir.display(), "dataset cache miss, reloading");
        let dataset = Arc::new(load_faction_files(&files));
        *entry = Some(CacheEntry {
            fingerprint,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
