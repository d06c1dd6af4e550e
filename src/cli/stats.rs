//! Stats command for vaultxp.
//!
//! Opens the stats view: the skill grid as last persisted, or freshly
//! computed with `--refresh`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::open_controller;
use crate::config::Config;
use crate::controller::CycleReport;
use crate::skills::SkillKind;
use crate::view::{build_cells, render_grid, SkillCell};

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Show the tooltip legend under the grid.
    pub detailed: bool,
    /// Run a cycle before rendering.
    pub refresh: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    /// Whether the stats were rendered.
    pub success: bool,
    /// Vault root the stats belong to.
    pub vault: PathBuf,
    /// Whether skill names are shown.
    pub show_skill_names: bool,
    /// Combined level of the seven computed skills.
    pub total_level: u32,
    /// One cell per skill.
    pub cells: Vec<SkillCell>,
    /// Report of the cycle run for `--refresh`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleReport>,
    /// Warnings (e.g., a failed refresh).
    pub warnings: Vec<String>,
    /// Error message if stats failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatsOutput {
    /// Create a failed output.
    pub fn failure(vault: PathBuf, error: impl Into<String>) -> Self {
        Self {
            success: false,
            vault,
            show_skill_names: true,
            total_level: 0,
            cells: Vec::new(),
            cycle: None,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The stats command implementation.
pub struct StatsCommand {
    config: Config,
    cwd: PathBuf,
}

impl StatsCommand {
    /// Create a new stats command.
    pub fn new(config: Config, cwd: impl AsRef<Path>) -> Self {
        Self {
            config,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Run the stats command.
    ///
    /// A failed refresh is a warning: the persisted values are still shown.
    pub async fn run(&self, options: &StatsOptions) -> StatsOutput {
        let mut controller = open_controller(&self.config, &self.cwd);
        let vault = controller.vault().root().to_path_buf();
        if !vault.is_dir() {
            return StatsOutput::failure(
                vault.clone(),
                format!("vault not found: {}", vault.display()),
            );
        }

        let mut warnings = Vec::new();
        let cycle = if options.refresh {
            match controller.run_cycle().await {
                Ok(report) => {
                    if !report.persisted {
                        warnings.push("Skills were updated but could not be saved.".to_string());
                    }
                    Some(report)
                }
                Err(e) => {
                    warnings.push(format!("Refresh failed, showing saved values: {}", e));
                    None
                }
            }
        } else {
            None
        };

        let settings = controller.settings();
        let registry = controller.registry();
        StatsOutput {
            success: true,
            vault,
            show_skill_names: settings.show_skill_names,
            total_level: registry.get(SkillKind::TotalLevel).level(),
            cells: build_cells(registry, settings.show_skill_names),
            cycle,
            warnings,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, options)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if !output.success {
            return format!(
                "Stats failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        for warning in &output.warnings {
            lines.push(format!("Warning: {}", warning));
        }
        lines.push(render_grid(&output.cells, options.detailed));
        lines.push(format!("Total level: {}", output.total_level));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "[[B]] #idea\n- [x] shipped").unwrap();
        fs::write(temp.path().join("b.md"), "just some words").unwrap();
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("assets").join("cover.png"), [0u8, 1, 2]).unwrap();
        temp
    }

    fn config_for(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.vault.root = Some(temp.path().to_path_buf());
        config
    }

    #[tokio::test]
    async fn test_stats_without_refresh_shows_saved_values() {
        let temp = setup();
        let cmd = StatsCommand::new(config_for(&temp), temp.path());

        let output = cmd.run(&StatsOptions::default()).await;

        assert!(output.success);
        assert_eq!(output.cells.len(), 8);
        assert!(output.cells.iter().all(|c| c.xp == 0));
        assert!(output.cycle.is_none());
    }

    #[tokio::test]
    async fn test_stats_refresh_computes_and_persists() {
        let temp = setup();
        let cmd = StatsCommand::new(config_for(&temp), temp.path());
        let options = StatsOptions {
            refresh: true,
            ..Default::default()
        };

        let output = cmd.run(&options).await;
        assert!(output.success);
        let archivist = output.cells.iter().find(|c| c.key == "archivist").unwrap();
        assert_eq!(archivist.xp, 16);
        assert!(output.cycle.as_ref().unwrap().persisted);
        assert!(temp.path().join(".vaultxp").join("data.json").exists());

        // A second run without refresh sees the persisted values.
        let again = cmd.run(&StatsOptions::default()).await;
        let hoarder = again.cells.iter().find(|c| c.key == "hoarder").unwrap();
        assert_eq!(hoarder.xp, 24);
    }

    #[tokio::test]
    async fn test_stats_missing_vault_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.vault.root = Some(temp.path().join("missing"));
        let cmd = StatsCommand::new(config, temp.path());

        let output = cmd.run(&StatsOptions::default()).await;
        assert!(!output.success);
        assert!(output.error.unwrap().contains("vault not found"));
    }

    #[tokio::test]
    async fn test_format_output() {
        let temp = setup();
        let cmd = StatsCommand::new(config_for(&temp), temp.path());
        let output = cmd.run(&StatsOptions::default()).await;

        let quiet = StatsOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &quiet).is_empty());

        let json = StatsOptions {
            json: true,
            ..Default::default()
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(parsed["success"], true);
        assert!(parsed["cells"][0]["tooltip"].as_str().unwrap().contains("XP"));

        let human = cmd.format_output(&output, &StatsOptions::default());
        assert!(human.contains("Lv 0"));
        assert!(human.contains("Total level: 0"));

        let detailed = StatsOptions {
            detailed: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &detailed).contains("to next level"));
    }

    #[test]
    fn test_format_failure() {
        let cmd = StatsCommand::new(Config::default(), "/tmp");
        let output = StatsOutput::failure(PathBuf::from("/nowhere"), "vault not found");
        let human = cmd.format_output(&output, &StatsOptions::default());
        assert!(human.starts_with("Stats failed: vault not found"));
    }
}
