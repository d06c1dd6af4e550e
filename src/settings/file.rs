//! File-based settings storage for vaultxp.
//!
//! Settings are stored as one JSON file, `<vault>/.vaultxp/data.json` by
//! default. Atomic writes are achieved via temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultXpError};
use crate::settings::{Settings, SettingsStore};

/// File-based settings storage.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    /// Path of the settings JSON file.
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store for the given settings file. The file and its parent
    /// directory are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path for the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| VaultXpError::storage(&self.path, e))?;
        let settings: Settings = serde_json::from_str(&content)?;

        Ok(Some(settings))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| VaultXpError::storage(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        let temp_path = self.temp_path();

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| VaultXpError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| VaultXpError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| VaultXpError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &self.path).map_err(|e| VaultXpError::storage(&self.path, e))?;

        Ok(())
    }
}
