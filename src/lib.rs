//! vaultxp - skill levels for a notes vault
//!
//! vaultxp scans a vault of notes and attachments, turns what it finds into
//! seven skills (words written, notes, files, attachments, links, completed
//! tasks, distinct tags) plus a Total Level, and shows them as a grid. Skill
//! values and user settings persist in a JSON file next to the vault.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod level;
pub mod settings;
pub mod skills;
pub mod vault;
pub mod view;

pub use config::Config;
pub use controller::{ControlCommand, Controller, CycleReport, SkillReport};
pub use error::{Result, VaultXpError};
pub use level::{level_for_xp, xp_threshold, xp_to_next_level};
pub use settings::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
pub use skills::{
    compute, compute_all, SavedSkill, Skill, SkillKind, SkillRegistry, SkillSnapshot, VaultListing,
};
pub use vault::{ContentCache, FsVault, MemoryVault, Vault, VaultFile};
pub use view::{StatsView, View, Workspace};

// CLI commands
pub use cli::{RefreshCommand, SettingsCommand, SettingsPanel, StatsCommand, WatchCommand};
