//! Analysis cache store — durable name → analysis mapping.
//!
//! The whole [`CacheDocument`] is held in memory with an index from
//! normalized name to the first entry carrying that name. Inserts append
//! and then persist the full document through [`CacheStorage`].
//!
//! Writers are serialized by `writer`; each persist writes the latest
//! in-memory snapshot, so concurrent inserts are never lost. Readers only
//! touch the in-memory state and never wait on storage I/O.

pub mod storage;

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mw_dietary::AnalysisLookup;
use mw_protocol::{CacheDocument, CacheEntry, DietaryAnalysis, Dish, normalize_name};

pub use storage::{CacheStorage, FileStorage, MemoryStorage};

/// Errors from loading or persisting the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error on {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias.
pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Default)]
struct CacheState {
    document: CacheDocument,
    index: HashMap<String, usize>,
}

impl CacheState {
    fn from_document(document: CacheDocument) -> Self {
        let mut index = HashMap::with_capacity(document.meals.len());
        for (pos, entry) in document.meals.iter().enumerate() {
            index.entry(normalize_name(&entry.name)).or_insert(pos);
        }
        Self { document, index }
    }

    /// Append unless the name is already present.
    fn push(&mut self, entry: CacheEntry) -> bool {
        let key = normalize_name(&entry.name);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.document.meals.len());
        self.document.meals.push(entry);
        true
    }
}

/// The analysis cache. Construct once at startup and share via `Arc`.
pub struct AnalysisCache {
    storage: Arc<dyn CacheStorage>,
    state: RwLock<CacheState>,
    writer: tokio::sync::Mutex<()>,
}

impl AnalysisCache {
    /// Load the document from storage, creating an empty one if none exists.
    pub async fn load(storage: Arc<dyn CacheStorage>) -> CacheResult<Self> {
        let document = match storage.read().await? {
            Some(bytes) => {
                let (document, rejected) = CacheDocument::from_slice_lenient(&bytes)?;
                for entry in &rejected {
                    tracing::warn!(
                        location = %storage.location(),
                        position = entry.position,
                        name = entry.name.as_deref().unwrap_or("<unnamed>"),
                        reason = %entry.reason,
                        "skipping cache entry without a complete analysis"
                    );
                }
                document
            }
            None => {
                let empty = CacheDocument::default();
                storage.write(&serde_json::to_vec_pretty(&empty)?).await?;
                tracing::info!(location = %storage.location(), "created empty meal analysis cache");
                empty
            }
        };

        let state = CacheState::from_document(document);
        tracing::info!(
            location = %storage.location(),
            entries = state.document.meals.len(),
            distinct = state.index.len(),
            "meal analysis cache loaded"
        );

        Ok(Self {
            storage,
            state: RwLock::new(state),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// An empty cache backed by memory (tests and development).
    pub async fn in_memory() -> CacheResult<Self> {
        Self::load(Arc::new(MemoryStorage::new())).await
    }

    /// Analysis for a normalized-name match, if cached.
    pub fn get(&self, name: &str) -> Option<DietaryAnalysis> {
        let state = self.read_state();
        state
            .index
            .get(&normalize_name(name))
            .map(|&pos| state.document.meals[pos].analysis)
    }

    /// Analysis for a dish, if cached.
    pub fn lookup_dish(&self, dish: &dyn Dish) -> Option<DietaryAnalysis> {
        self.get(dish.name())
    }

    /// Append one entry and persist. Returns `false` if the name was
    /// already cached (nothing written).
    pub async fn insert(&self, entry: CacheEntry) -> CacheResult<bool> {
        Ok(self.insert_many(vec![entry]).await? == 1)
    }

    /// Append entries and persist once. Returns how many were new.
    ///
    /// Entries stay in memory even if persisting fails; the next
    /// successful write carries them.
    pub async fn insert_many(&self, entries: Vec<CacheEntry>) -> CacheResult<usize> {
        let _writer = self.writer.lock().await;

        let added = {
            let mut state = self.write_state();
            entries
                .into_iter()
                .map(|e| state.push(e))
                .filter(|&pushed| pushed)
                .count()
        };
        if added == 0 {
            return Ok(0);
        }

        let bytes = serde_json::to_vec_pretty(&self.read_state().document)?;
        self.storage.write(&bytes).await?;
        tracing::debug!(added, total = self.len(), "meal analysis cache persisted");
        Ok(added)
    }

    /// Copy of the full document.
    pub fn snapshot(&self) -> CacheDocument {
        self.read_state().document.clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read_state().document.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AnalysisLookup for AnalysisCache {
    fn lookup(&self, dish: &dyn Dish) -> Option<DietaryAnalysis> {
        self.lookup_dish(dish)
    }
}
