//! Refresh command for vaultxp.
//!
//! Runs one cycle, persists the result and prints the cycle report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::open_controller;
use crate::config::Config;
use crate::controller::CycleReport;
use crate::view::format_xp;
use crate::view::icons::glyph;

/// Options for the refresh command.
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the refresh command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutput {
    /// Whether the cycle completed.
    pub success: bool,
    /// Vault root that was scanned.
    pub vault: PathBuf,
    /// The completed cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
    /// Error message if the cycle failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefreshOutput {
    pub fn success(vault: PathBuf, report: CycleReport) -> Self {
        Self {
            success: true,
            vault,
            report: Some(report),
            error: None,
        }
    }

    pub fn failure(vault: PathBuf, error: impl Into<String>) -> Self {
        Self {
            success: false,
            vault,
            report: None,
            error: Some(error.into()),
        }
    }
}

/// The refresh command implementation.
pub struct RefreshCommand {
    config: Config,
    cwd: PathBuf,
}

impl RefreshCommand {
    /// Create a new refresh command.
    pub fn new(config: Config, cwd: impl AsRef<Path>) -> Self {
        Self {
            config,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Run the refresh command.
    pub async fn run(&self, _options: &RefreshOptions) -> RefreshOutput {
        let mut controller = open_controller(&self.config, &self.cwd);
        let vault = controller.vault().root().to_path_buf();
        if !vault.is_dir() {
            let message = format!("vault not found: {}", vault.display());
            return RefreshOutput::failure(vault, message);
        }

        let output = match controller.run_cycle().await {
            Ok(report) => RefreshOutput::success(vault, report),
            Err(e) => RefreshOutput::failure(vault, e.to_string()),
        };
        controller.shutdown().await;
        output
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RefreshOutput, options: &RefreshOptions) -> String {
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
    fn format_human_readable(&self, output: &RefreshOutput) -> String {
        let report = match (&output.report, output.success) {
            (Some(report), true) => report,
            _ => {
                return format!(
                    "Refresh failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        };

        let mut lines = vec![format!("Skills for {}", output.vault.display())];
        for skill in &report.skills {
            lines.push(format!(
                "  {} {:<12} Lv {:>3}  {}",
                glyph(&skill.icon),
                skill.name,
                skill.level,
                format_xp(skill.xp)
            ));
        }
        lines.push(format!(
            "Updated in {} ms at {}",
            report.duration_ms,
            report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if !report.persisted {
            lines.push("Warning: skills could not be saved".to_string());
        }

        lines.join("\n")
    }
}
