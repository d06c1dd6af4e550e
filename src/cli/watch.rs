//! Watch command for vaultxp.
//!
//! Opens the stats view on stdout, runs a cycle every update interval and
//! applies settings typed into the panel on stdin until `quit` or Ctrl-C.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::cli::panel::PANEL_HELP;
use crate::cli::{open_controller, SettingsPanel};
use crate::config::Config;
use crate::view::StatsView;

/// Options for the watch command.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Show the tooltip legend under the grid.
    pub detailed: bool,
    /// Suppress the exit summary.
    pub quiet: bool,
}

/// Output format for the watch command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchOutput {
    /// Whether watching ended normally.
    pub success: bool,
    /// Vault root that was watched.
    pub vault: PathBuf,
    /// Successful cycles while watching.
    pub cycles: u64,
    /// Error message if watching could not start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The watch command implementation.
pub struct WatchCommand {
    config: Config,
    cwd: PathBuf,
}

impl WatchCommand {
    /// Create a new watch command.
    pub fn new(config: Config, cwd: impl AsRef<Path>) -> Self {
        Self {
            config,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Run until the panel sends `quit`, stdin closes or Ctrl-C arrives.
    pub async fn run(&self, options: &WatchOptions) -> WatchOutput {
        let mut controller = open_controller(&self.config, &self.cwd);
        let vault = controller.vault().root().to_path_buf();
        if !vault.is_dir() {
            let message = format!("vault not found: {}", vault.display());
            return WatchOutput {
                success: false,
                vault,
                cycles: 0,
                error: Some(message),
            };
        }

        let detailed = options.detailed;
        controller.open_stats_view(move || Box::new(StatsView::stdout().detailed(detailed)));
        if !options.quiet {
            eprintln!(
                "Watching {} every {} min. {}",
                vault.display(),
                controller.settings().update_interval,
                PANEL_HELP
            );
        }

        let (tx, rx) = mpsc::channel(16);
        let panel = SettingsPanel::spawn_stdin(tx);
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        controller.run(rx, ctrl_c).await;
        panel.abort();

        WatchOutput {
            success: true,
            vault,
            cycles: controller.cycles(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &WatchOutput, options: &WatchOptions) -> String {
        if options.quiet {
            return String::new();
        }

        match &output.error {
            Some(error) => format!("Watch failed: {}\n", error),
            None => format!(
                "Stopped watching {} after {} cycle{}.",
                output.vault.display(),
                output.cycles,
                if output.cycles == 1 { "" } else { "s" }
            ),
        }
    }
}
