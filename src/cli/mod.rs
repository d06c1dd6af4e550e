//! CLI commands for vaultxp.
//!
//! - **One-shot commands**: stats, refresh, settings
//! - **Long-running command**: watch (periodic cycles plus live settings
//!   commands read from stdin through the settings panel)

pub mod panel;
pub mod refresh;
pub mod settings;
pub mod stats;
pub mod watch;

pub use panel::SettingsPanel;
pub use refresh::RefreshCommand;
pub use settings::SettingsCommand;
pub use stats::StatsCommand;
pub use watch::WatchCommand;

use std::path::Path;

use crate::config::Config;
use crate::controller::Controller;
use crate::settings::FileSettingsStore;
use crate::vault::FsVault;

/// Controller over a vault on disk with settings in a JSON file.
pub type FsController = Controller<FsVault, FileSettingsStore>;

/// Build the controller for the vault that `config` resolves from `cwd`.
pub fn open_controller(config: &Config, cwd: &Path) -> FsController {
    let root = config.vault_root(cwd);
    let store = FileSettingsStore::new(config.settings_path(&root));
    tracing::debug!(
        vault = %root.display(),
        settings = %store.path().display(),
        "opening vault"
    );
    let vault = FsVault::new(root, config.vault.document_extension.clone())
        .include_hidden(config.vault.include_hidden);
    Controller::load(vault, store)
}
