//! Vault access traits.
//!
//! A vault is a flat collection of files addressed by vault-relative paths.
//! Text documents are the files carrying the vault's document extension.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A file in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultFile {
    /// Vault-relative path using `/` separators.
    pub path: String,
    /// Extension without the leading dot; empty when the file has none.
    pub extension: String,
}

impl VaultFile {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let extension = Path::new(&path)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, extension }
    }
}

/// Read-only access to a vault's files.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Extension that marks a file as a text document (e.g. `md`).
    fn document_extension(&self) -> &str;

    /// Every file in the vault, of any type.
    async fn files(&self) -> Result<Vec<VaultFile>>;

    /// Read a file's text content.
    async fn read(&self, file: &VaultFile) -> Result<String>;

    /// Every text document in the vault.
    async fn documents(&self) -> Result<Vec<VaultFile>> {
        let extension = self.document_extension().to_string();
        Ok(self
            .files()
            .await?
            .into_iter()
            .filter(|file| file.extension == extension)
            .collect())
    }
}

#[async_trait]
impl<T: Vault + ?Sized> Vault for Arc<T> {
    fn document_extension(&self) -> &str {
        (**self).document_extension()
    }

    async fn files(&self) -> Result<Vec<VaultFile>> {
        (**self).files().await
    }

    async fn read(&self, file: &VaultFile) -> Result<String> {
        (**self).read(file).await
    }

    async fn documents(&self) -> Result<Vec<VaultFile>> {
        (**self).documents().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_file_extension() {
        assert_eq!(VaultFile::new("notes/today.md").extension, "md");
        assert_eq!(VaultFile::new("assets/photo.final.png").extension, "png");
        assert_eq!(VaultFile::new("README").extension, "");
    }
}
