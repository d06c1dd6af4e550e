//! In-memory vault for testing.
//!
//! Thread-safe implementation using `RwLock<BTreeMap>`. Counts listings and
//! reads so cache behavior can be asserted, and can be told to fail reads of given paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, VaultXpError};
use crate::vault::{Vault, VaultFile};

/// In-memory vault keyed by vault-relative path.
#[derive(Debug)]
pub struct MemoryVault {
    document_extension: String,
    files: RwLock<BTreeMap<String, String>>,
    failing: RwLock<HashSet<String>>,
    reads: AtomicUsize,
    listings: AtomicUsize,
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new("md")
    }
}

impl MemoryVault {
    pub fn new(document_extension: impl Into<String>) -> Self {
        Self {
            document_extension: document_extension.into(),
            files: RwLock::new(BTreeMap::new()),
            failing: RwLock::new(HashSet::new()),
            reads: AtomicUsize::new(0),
            listings: AtomicUsize::new(0),
        }
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Builder form of [`MemoryVault::insert`].
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn remove(&self, path: &str) {
        self.files.write().unwrap().remove(path);
    }

    /// Make every read of `path` fail until [`MemoryVault::heal`] is called.
    pub fn fail_reads_of(&self, path: impl Into<String>) {
        self.failing.write().unwrap().insert(path.into());
    }

    pub fn heal(&self) {
        self.failing.write().unwrap().clear();
    }

    /// Number of `files()` calls so far.
    pub fn list_count(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    /// Number of successful and failed reads so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Vault for MemoryVault {
    fn document_extension(&self) -> &str {
        &self.document_extension
    }

    async fn files(&self) -> Result<Vec<VaultFile>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        let files = self.files.read().unwrap();
        Ok(files.keys().map(VaultFile::new).collect())
    }

    async fn read(&self, file: &VaultFile) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.read().unwrap().contains(&file.path) {
            return Err(VaultXpError::vault(format!("failed to read {}", file.path)));
        }
        self.files
            .read()
            .unwrap()
            .get(&file.path)
            .cloned()
            .ok_or_else(|| VaultXpError::vault(format!("no such file: {}", file.path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vault_lists_and_reads() {
        let vault = MemoryVault::default()
            .with_file("a.md", "alpha")
            .with_file("b.png", "");

        assert_eq!(vault.files().await.unwrap().len(), 2);
        assert_eq!(vault.documents().await.unwrap().len(), 1);
        assert_eq!(vault.read(&VaultFile::new("a.md")).await.unwrap(), "alpha");
        assert_eq!(vault.read_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let vault = MemoryVault::default().with_file("a.md", "alpha");
        vault.fail_reads_of("a.md");
        assert!(vault.read(&VaultFile::new("a.md")).await.is_err());

        vault.heal();
        assert!(vault.read(&VaultFile::new("a.md")).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove() {
        let vault = MemoryVault::default().with_file("a.md", "alpha");
        vault.remove("a.md");
        assert!(vault.files().await.unwrap().is_empty());
    }
}
