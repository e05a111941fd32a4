//! Process-wide memoization of the cleaned dataset.
//!
//! Cleaning the full file is the only expensive step of a render pass, so the
//! result is kept for the lifetime of the process and shared via `Arc`. The
//! slot is keyed by a token derived from the raw source bytes; a different
//! source replaces it, the same source returns the same `Arc`.
//!
//! Loads by path have their own slot keyed by file metadata, so a hit never
//! touches the file contents.

use crate::error::Result;
use crate::loader;
use crate::observation::Dataset;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

/// Content/version token of a dataset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceToken {
    len: usize,
    digest: u64,
}

impl SourceToken {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }
}

/// Version token of a dataset file: its path, length and modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToken {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl FileToken {
    /// Token from the file's metadata, or `None` when it cannot be stat'ed.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Single-slot cache of the most recently loaded dataset.
#[derive(Default)]
pub struct DatasetCache {
    slot: Mutex<Option<(SourceToken, Arc<Dataset>)>>,
    file_slot: Mutex<Option<(FileToken, Arc<Dataset>)>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for these bytes, loading it on a miss.
    ///
    /// Errors are returned as-is and leave the slot untouched.
    pub fn get_or_load(&self, bytes: &[u8]) -> Result<Arc<Dataset>> {
        let token = SourceToken::of(bytes);
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((cached_token, dataset)) = slot.as_ref() {
            if *cached_token == token {
                log::debug!("[CO2] cache: hit ({} bytes)", token.len);
                return Ok(Arc::clone(dataset));
            }
        }

        log::info!("[CO2] cache: miss, loading {} bytes", token.len);
        let dataset = Arc::new(loader::load_bytes(bytes)?);
        *slot = Some((token, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Return the cached dataset for `path`, reading the file only on a miss.
    ///
    /// A hit needs the same path with unchanged length and mtime. A file that
    /// can no longer be stat'ed keeps serving the dataset cached for its path.
    pub fn get_or_load_path(&self, path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
        let path = path.as_ref();
        let token = FileToken::of(path);
        let mut slot = self.file_slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((cached_token, dataset)) = slot.as_ref() {
            let hit = match &token {
                Some(token) => token == cached_token,
                None => cached_token.path == path,
            };
            if hit {
                log::debug!("[CO2] cache: hit for {}", path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        let bytes = loader::read_source(path)?;
        let dataset = self.get_or_load(&bytes)?;
        // Stat again after the read so the token matches what was loaded
        if let Some(token) = FileToken::of(path) {
            *slot = Some((token, Arc::clone(&dataset)));
        }
        Ok(dataset)
    }

    /// Token of the currently cached source, if any.
    pub fn token(&self) -> Option<SourceToken> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(token, _)| *token)
    }
}

/// The process-wide cache, created on first access.
pub fn global() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}

/// Load through the process-wide cache.
pub fn load_cached(bytes: &[u8]) -> Result<Arc<Dataset>> {
    global().get_or_load(bytes)
}

/// Load a file through the process-wide cache.
pub fn load_path_cached(path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
    global().get_or_load_path(path)
}
