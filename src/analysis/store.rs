use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::analysis::handle::HeatmapHandle;

/// Attempts at drawing an unused handle before giving up.
const MAX_INSERT_ATTEMPTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no heatmap stored under {0}")]
    NotFound(HeatmapHandle),

    #[error("could not allocate an unused heatmap handle")]
    Exhausted,

    #[error("heatmap storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("heatmap store lock poisoned")]
    Poisoned,
}

/// Holds encoded heatmaps between `/detect` and `/heatmap/{handle}`.
///
/// `take` hands the bytes over exactly once; afterwards the handle is
/// unknown. Implementations must be safe to share across request threads.
pub trait HeatmapStore: Send + Sync {
    /// Stores `bytes` under a newly generated handle that no other live
    /// artifact uses.
    fn insert(&self, bytes: Vec<u8>) -> Result<HeatmapHandle, StoreError>;

    /// Removes and returns the artifact for `handle`.
    fn take(&self, handle: &HeatmapHandle) -> Result<Vec<u8>, StoreError>;

    /// Number of artifacts awaiting delivery.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<HeatmapHandle, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl HeatmapStore for MemoryStore {
    fn insert(&self, bytes: Vec<u8>) -> Result<HeatmapHandle, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let handle = HeatmapHandle::generate();
            if !entries.contains_key(&handle) {
                entries.insert(handle.clone(), bytes);
                return Ok(handle);
            }
        }
        Err(StoreError::Exhausted)
    }

    fn take(&self, handle: &HeatmapHandle) -> Result<Vec<u8>, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(handle).ok_or_else(|| StoreError::NotFound(handle.clone()))
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// ---------------------------------------------------------------------------
// Directory-backed
// ---------------------------------------------------------------------------

/// One `<handle>.jpg` file per artifact inside `dir`.
///
/// Files are created with create-new semantics, so a handle collision shows
/// up as `AlreadyExists` and is retried with a fresh handle.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<DirStore, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(DirStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, handle: &HeatmapHandle) -> PathBuf {
        self.dir.join(format!("{}.jpg", handle))
    }
}

impl HeatmapStore for DirStore {
    fn insert(&self, bytes: Vec<u8>) -> Result<HeatmapHandle, StoreError> {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let handle = HeatmapHandle::generate();
            let path = self.path_for(&handle);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = file.write_all(&bytes).and_then(|_| file.flush()) {
                let _ = std::fs::remove_file(&path);
                return Err(e.into());
            }
            return Ok(handle);
        }
        Err(StoreError::Exhausted)
    }

    fn take(&self, handle: &HeatmapHandle) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(handle);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(handle.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        // A concurrent take may have won the race; only one caller removes it.
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(handle.clone())),
            Err(e) => Err(e.into()),
        }
    }

    fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| {
                        let path = e.path();
                        path.extension().and_then(|s| s.to_str()) == Some("jpg")
                            && path
                                .file_stem()
                                .and_then(|s| s.to_str())
                                .map_or(false, |stem| stem.parse::<HeatmapHandle>().is_ok())
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}
