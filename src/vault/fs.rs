//! Filesystem-backed vault.
//!
//! Walks the vault directory with `walkdir`. Hidden entries (dot-prefixed,
//! such as `.obsidian/`, `.trash/` or our own `.vaultxp/`) are not part of the
//! vault unless `include_hidden` is set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, VaultXpError};
use crate::vault::{Vault, VaultFile};

/// A vault rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    document_extension: String,
    include_hidden: bool,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>, document_extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            document_extension: document_extension.into(),
            include_hidden: false,
        }
    }

    /// Also scan dot-prefixed files and directories.
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(root: &Path, include_hidden: bool) -> Result<Vec<VaultFile>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            // The root itself may be dot-prefixed (temp dirs are).
            .filter_entry(|entry| entry.depth() == 0 || include_hidden || !is_hidden(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                VaultXpError::vault(format!("failed to list {}: {}", root.display(), e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root).map_err(|e| {
                VaultXpError::vault(format!("{} escapes vault: {}", entry.path().display(), e))
            })?;
            files.push(VaultFile::new(
                relative.to_string_lossy().replace('\\', "/"),
            ));
        }
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[async_trait]
impl Vault for FsVault {
    fn document_extension(&self) -> &str {
        &self.document_extension
    }

    async fn files(&self) -> Result<Vec<VaultFile>> {
        let root = self.root.clone();
        let include_hidden = self.include_hidden;
        tokio::task::spawn_blocking(move || Self::walk(&root, include_hidden))
            .await
            .map_err(|e| VaultXpError::vault(format!("vault listing task failed: {}", e)))?
    }

    async fn read(&self, file: &VaultFile) -> Result<String> {
        let path = self.root.join(&file.path);
        tracing::debug!(path = %file.path, "reading vault file");
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| VaultXpError::storage(&path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("daily")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::create_dir_all(root.join(".obsidian")).unwrap();
        fs::write(root.join("index.md"), "# Index\n[[daily/monday]]").unwrap();
        fs::write(root.join("daily").join("monday.md"), "- [x] done").unwrap();
        fs::write(root.join("assets").join("logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        fs::write(root.join(".obsidian").join("app.json"), "{}").unwrap();
        fs::write(root.join(".hidden.md"), "secret").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_files_skips_hidden_entries() {
        let dir = setup_vault();
        let vault = FsVault::new(dir.path(), "md");

        let files = vault.files().await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["assets/logo.png", "daily/monday.md", "index.md"]);
    }

    #[tokio::test]
    async fn test_include_hidden() {
        let dir = setup_vault();
        let vault = FsVault::new(dir.path(), "md").include_hidden(true);

        let files = vault.files().await.unwrap();
        assert!(files.iter().any(|f| f.path == ".obsidian/app.json"));
        assert!(files.iter().any(|f| f.path == ".hidden.md"));
    }

    #[tokio::test]
    async fn test_documents_filters_by_extension() {
        let dir = setup_vault();
        let vault = FsVault::new(dir.path(), "md");

        let docs = vault.documents().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.extension == "md"));
    }

    #[tokio::test]
    async fn test_read_returns_content() {
        let dir = setup_vault();
        let vault = FsVault::new(dir.path(), "md");

        let text = vault.read(&VaultFile::new("daily/monday.md")).await.unwrap();
        assert_eq!(text, "- [x] done");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_storage_error() {
        let dir = setup_vault();
        let vault = FsVault::new(dir.path(), "md");

        let err = vault.read(&VaultFile::new("gone.md")).await.unwrap_err();
        assert!(matches!(err, VaultXpError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_missing_root_fails_listing() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path().join("nope"), "md");

        assert!(vault.files().await.is_err());
    }
}
