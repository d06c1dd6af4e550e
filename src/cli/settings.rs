//! Settings command for vaultxp.
//!
//! Shows or edits the two user settings. After a change the stats view is
//! re-rendered so the effect is visible immediately.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::open_controller;
use crate::config::Config;
use crate::view::{build_cells, render_grid};

/// Options for the settings command.
#[derive(Debug, Clone, Default)]
pub struct SettingsOptions {
    /// New value for showing skill names.
    pub show_names: Option<bool>,
    /// New update interval in minutes, as typed.
    pub interval: Option<String>,
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the settings command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsOutput {
    /// Whether the settings were read (and saved, if changed).
    pub success: bool,
    /// Whether any setting was changed.
    pub changed: bool,
    /// Settings file location.
    pub path: PathBuf,
    pub show_skill_names: bool,
    /// Effective update interval in minutes.
    pub update_interval: u64,
    /// Stats view rendered with the new settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Error message if saving failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The settings command implementation.
pub struct SettingsCommand {
    config: Config,
    cwd: PathBuf,
}

impl SettingsCommand {
    /// Create a new settings command.
    pub fn new(config: Config, cwd: impl AsRef<Path>) -> Self {
        Self {
            config,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Run the settings command.
    pub fn run(&self, options: &SettingsOptions) -> SettingsOutput {
        let mut controller = open_controller(&self.config, &self.cwd);
        let path = self
            .config
            .settings_path(&self.config.vault_root(&self.cwd));

        let mut changed = false;
        let mut result = Ok(());
        if let Some(show) = options.show_names {
            changed = true;
            result = controller.set_show_skill_names(show);
        }
        if let Some(raw) = &options.interval {
            changed = true;
            result = result.and_then(|_| controller.set_update_interval(raw).map(|_| ()));
        }

        let settings = controller.settings();
        let preview = changed.then(|| {
            render_grid(
                &build_cells(controller.registry(), settings.show_skill_names),
                false,
            )
        });

        SettingsOutput {
            success: result.is_ok(),
            changed,
            path,
            show_skill_names: settings.show_skill_names,
            update_interval: settings.update_interval,
            preview,
            error: result.err().map(|e| e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SettingsOutput, options: &SettingsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &SettingsOutput) -> String {
        let mut lines = Vec::new();
        if let Some(error) = &output.error {
            lines.push(format!("Failed to save settings: {}", error));
        } else if output.changed {
            lines.push(format!("Saved {}", output.path.display()));
        }

        lines.push(format!(
            "Show skill names: {}",
            if output.show_skill_names { "on" } else { "off" }
        ));
        lines.push(format!(
            "Update interval:  {} minute{}",
            output.update_interval,
            if output.update_interval == 1 { "" } else { "s" }
        ));

        if let Some(preview) = &output.preview {
            lines.push(String::new());
            lines.push(preview.clone());
        }

        lines.join("\n")
    }
}
