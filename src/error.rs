//! Unified error types for vaultxp.
//!
//! Only a failed refresh cycle is surfaced to the caller. Loading settings and
//! configuration is fail-open: problems are logged and defaults are used so a
//! damaged `data.json` never prevents the stats view from opening.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for vaultxp operations.
#[derive(Error, Debug)]
pub enum VaultXpError {
    /// I/O errors from settings or vault file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Vault listing or content read failures.
    #[error("vault error: {message}")]
    Vault { message: String },

    /// JSON serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// View hosting errors.
    #[error("view error: {message}")]
    View { message: String },
}

/// A specialized Result type for vaultxp operations.
pub type Result<T> = std::result::Result<T, VaultXpError>;

impl VaultXpError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a vault error.
    pub fn vault(message: impl Into<String>) -> Self {
        Self::Vault {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a view error.
    pub fn view(message: impl Into<String>) -> Self {
        Self::View {
            message: message.into(),
        }
    }
}

impl From<io::Error> for VaultXpError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for VaultXpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Used when loading settings, where a broken file should
/// degrade to defaults instead of stopping the command.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the vaultxp CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command failed (e.g. a refresh cycle aborted on a read error).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
