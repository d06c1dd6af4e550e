//! Configuration loading for vaultxp.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Vault config (`<vault>/.vaultxp/config.toml`)
//! 3. User config (`~/.vaultxp/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. User preferences that the stats view edits
//! (skill names, update interval) live in the settings blob, not here.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultXpError};

/// Name of the per-vault and per-user data directories.
pub const DATA_DIR_NAME: &str = ".vaultxp";

/// File name of the persisted settings blob.
pub const SETTINGS_FILE_NAME: &str = "data.json";

/// Main configuration struct for vaultxp.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which directory to scan and how.
    pub vault: VaultConfig,
    /// Where settings are persisted.
    pub storage: StorageConfig,
    /// Log output.
    pub log: LogConfig,
}

/// Vault scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VaultConfig {
    /// Vault root. When unset the root is discovered from the working directory.
    pub root: Option<PathBuf>,
    /// Extension that marks a text document.
    pub document_extension: String,
    /// Whether dot-prefixed files and directories count as vault content.
    pub include_hidden: bool,
}

impl VaultConfig {
    /// Check that an extension is usable: non-empty, no separators, no dot.
    pub fn is_valid_extension(value: &str) -> bool {
        !value.is_empty() && !value.contains(['.', '/', '\\']) && !value.contains(char::is_whitespace)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: None,
            document_extension: "md".to_string(),
            include_hidden: false,
        }
    }
}

/// Settings storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `data.json`. Defaults to `<vault>/.vaultxp`.
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` env-filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration for a working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        Self::load_with_vault(cwd, None)
    }

    /// Load configuration, taking the vault root from `--vault` when given.
    ///
    /// The root is settled before the vault layer is read: `vault`, else
    /// `VAULTXP_VAULT`, else the user config, else discovery from `cwd`.
    pub fn load_with_vault(cwd: &Path, vault: Option<&Path>) -> Self {
        let mut config = Config::default();

        // Layer 4 → 3: Apply user config
        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(root) = vault.map(Path::to_path_buf).or_else(env_vault_root) {
            config.vault.root = Some(root);
        }

        // Layer 3 → 2: Apply vault config
        if let Some(vault_config) = Self::load_vault_config(&config.vault_root(cwd)) {
            config = config.merge(vault_config);
        }

        // Layer 2 → 1: Apply environment variables
        config.apply_env_overrides();

        if let Some(root) = vault {
            config.vault.root = Some(root.to_path_buf());
        }

        config
    }

    /// Load user config from `~/.vaultxp/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = vaultxp_home()?;
        Self::load_from_file(&home.join("config.toml")).ok()
    }

    /// Load vault config from `<vault>/.vaultxp/config.toml`.
    fn load_vault_config(vault_root: &Path) -> Option<Config> {
        let path = vault_root.join(DATA_DIR_NAME).join("config.toml");
        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(VaultXpError::Storage { .. }) => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid vault config");
                None
            }
        }
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| VaultXpError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| VaultXpError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // VAULTXP_VAULT
        if let Ok(val) = env::var("VAULTXP_VAULT") {
            if val.trim().is_empty() {
                eprintln!("Warning: VAULTXP_VAULT is empty. Ignoring it.");
            } else {
                self.vault.root = Some(PathBuf::from(val));
            }
        }

        // VAULTXP_DOC_EXT
        if let Ok(val) = env::var("VAULTXP_DOC_EXT") {
            let ext = val.trim_start_matches('.');
            if VaultConfig::is_valid_extension(ext) {
                self.vault.document_extension = ext.to_string();
            } else {
                eprintln!(
                    "Warning: Invalid VAULTXP_DOC_EXT value '{}'. \
                    Expected a bare extension like 'md'. Using '{}'.",
                    val, self.vault.document_extension
                );
            }
        }

        // VAULTXP_INCLUDE_HIDDEN
        if let Ok(val) = env::var("VAULTXP_INCLUDE_HIDDEN") {
            match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => self.vault.include_hidden = true,
                "false" | "0" => self.vault.include_hidden = false,
                _ => eprintln!(
                    "Warning: Invalid VAULTXP_INCLUDE_HIDDEN value '{}'. \
                    Expected true, false, 1 or 0. Using '{}'.",
                    val, self.vault.include_hidden
                ),
            }
        }

        // VAULTXP_DATA_DIR
        if let Ok(val) = env::var("VAULTXP_DATA_DIR") {
            if !val.trim().is_empty() {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }

        // VAULTXP_LOG
        if let Ok(val) = env::var("VAULTXP_LOG") {
            if !val.trim().is_empty() {
                self.log.filter = val;
            }
        }
    }

    /// Merge another config into this one, field by field.
    ///
    /// Fields of `other` that differ from the defaults win. As a consequence a
    /// higher layer cannot set a value back to its default once a lower layer
    /// has changed it.
    fn merge(mut self, other: Config) -> Self {
        let default_vault = VaultConfig::default();
        if other.vault.root.is_some() {
            self.vault.root = other.vault.root;
        }
        if other.vault.document_extension != default_vault.document_extension {
            if VaultConfig::is_valid_extension(&other.vault.document_extension) {
                self.vault.document_extension = other.vault.document_extension;
            } else {
                tracing::warn!(
                    extension = %other.vault.document_extension,
                    "ignoring invalid document extension"
                );
            }
        }
        if other.vault.include_hidden != default_vault.include_hidden {
            self.vault.include_hidden = other.vault.include_hidden;
        }

        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        if other.log.filter != LogConfig::default().filter {
            self.log.filter = other.log.filter;
        }

        self
    }

    /// The vault root: configured, else discovered from `cwd`.
    ///
    /// A relative configured root is resolved against `cwd`.
    pub fn vault_root(&self, cwd: &Path) -> PathBuf {
        match &self.vault.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => find_vault_root(cwd),
        }
    }

    /// Path of the settings blob for the vault at `vault_root`.
    pub fn settings_path(&self, vault_root: &Path) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| vault_root.join(DATA_DIR_NAME))
            .join(SETTINGS_FILE_NAME)
    }
}

/// Get the vaultxp home directory for user-level files.
///
/// `$VAULTXP_HOME` if set and non-empty, otherwise `~/.vaultxp`.
pub fn vaultxp_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("VAULTXP_HOME") {
        if home.is_empty() {
            tracing::warn!("VAULTXP_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("VAULTXP_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// `VAULTXP_VAULT` when set and non-blank.
fn env_vault_root() -> Option<PathBuf> {
    env::var("VAULTXP_VAULT")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .map(PathBuf::from)
}

/// Find the vault root for a working directory.
///
/// Walks up from `cwd` looking for a `.vaultxp/` directory, then for a
/// `.obsidian/` directory, and falls back to `cwd` itself. The user-level
/// `~/.vaultxp` is not a vault marker.
pub fn find_vault_root(cwd: &Path) -> PathBuf {
    let home = vaultxp_home();
    for marker in [DATA_DIR_NAME, ".obsidian"] {
        for ancestor in cwd.ancestors() {
            let candidate = ancestor.join(marker);
            if candidate.is_dir() && home.as_deref() != Some(candidate.as_path()) {
                return ancestor.to_path_buf();
            }
        }
    }
    cwd.to_path_buf()
}
