//! Vault access for vaultxp.
//!
//! This module provides the file listing and content reading the skill
//! calculators scan, supporting a filesystem vault and an in-memory one.

pub mod cache;
pub mod fs;
pub mod memory;
pub mod traits;

pub use cache::{CacheStats, ContentCache};
pub use fs::FsVault;
pub use memory::MemoryVault;
pub use traits::{Vault, VaultFile};
