//! Settings storage for vaultxp.
//!
//! This module provides the persisted settings blob and its storage,
//! supporting file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod model;
pub mod traits;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
pub use model::{parse_update_interval, Settings, DEFAULT_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL};
pub use traits::SettingsStore;
