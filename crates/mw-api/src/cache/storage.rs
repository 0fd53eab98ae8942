//! Blob storage behind the analysis cache — a file on disk, or memory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{CacheError, CacheResult};

/// Where the cache document lives.
///
/// The whole document is read at startup and rewritten on every insert, so
/// the contract is just "read everything" and "replace everything".
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Read the stored document. `Ok(None)` when nothing has been stored yet.
    async fn read(&self) -> CacheResult<Option<Vec<u8>>>;

    /// Replace the stored document.
    async fn write(&self, bytes: &[u8]) -> CacheResult<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Stores the document as a JSON file. Writes go to a sibling temp file,
/// synced to disk, then renamed over the target, so a crash never leaves a
/// truncated document behind.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".into());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn io_error(&self, source: io::Error) -> CacheError {
        CacheError::Io {
            location: self.location(),
            source,
        }
    }
}

#[async_trait]
impl CacheStorage for FileStorage {
    async fn read(&self) -> CacheResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write(&self, bytes: &[u8]) -> CacheResult<()> {
        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(bytes).await.map_err(|e| self.io_error(e))?;
        // Data must be on disk before the rename makes it visible.
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(file);
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory storage for tests and development.
#[derive(Default)]
pub struct MemoryStorage {
    bytes: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current stored bytes, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of completed writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn read(&self) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    async fn write(&self, bytes: &[u8]) -> CacheResult<()> {
        *self.bytes.lock().unwrap_or_else(|e| e.into_inner()) = Some(bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}
