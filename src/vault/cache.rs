//! Read-through cache of vault file contents.
//!
//! The cache is shared by reference between the calculators of one cycle, so
//! a note scanned by several calculators is read once. The controller clears
//! it at the start of every cycle. Two calculators missing the same path at
//! the same moment may both read it; the first insert wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::Result;
use crate::vault::{Vault, VaultFile};

/// Hit/miss counters since the last clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Map from vault path to file text.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: RwLock<HashMap<String, Arc<str>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached text for `file`, reading it through `vault` on a miss.
    pub async fn get<V: Vault + ?Sized>(&self, vault: &V, file: &VaultFile) -> Result<Arc<str>> {
        if let Some(text) = self.entries.read().await.get(&file.path) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(text));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let text: Arc<str> = vault.read(file).await?.into();

        let mut entries = self.entries.write().await;
        let stored = entries.entry(file.path.clone()).or_insert(text);
        Ok(Arc::clone(stored))
    }

    /// Discard every entry and reset the counters.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
