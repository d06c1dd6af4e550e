//! The stats grid.
//!
//! Rendering is stateless: every call rebuilds the whole grid from the
//! registry and the `show_skill_names` flag. Each cell carries a tooltip
//! (description and formatted xp); the terminal shows tooltips as a legend
//! under the grid in detailed mode.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultXpError};
use crate::level::xp_to_next_level;
use crate::settings::Settings;
use crate::skills::SkillRegistry;
use crate::view::icons::glyph;
use crate::view::View;

/// View type tag of the stats grid.
pub const STATS_VIEW_TYPE: &str = "vaultxp-stats";

const COLUMNS: usize = 4;
const CELL_WIDTH: usize = 14;

/// One rendered grid cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillCell {
    /// Persisted skill key.
    pub key: String,
    /// Symbolic icon name.
    pub icon: String,
    /// Glyph the icon resolved to.
    pub glyph: String,
    pub level: u32,
    pub xp: u64,
    /// Present only when skill names are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hover text: description and formatted xp.
    pub tooltip: String,
    #[serde(skip)]
    xp_to_next: u64,
}

/// Format xp with thousands separators, e.g. `12,345 XP`.
pub fn format_xp(xp: u64) -> String {
    let digits = xp.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} XP", grouped)
}

/// Build one cell per skill, in registry order.
pub fn build_cells(registry: &SkillRegistry, show_skill_names: bool) -> Vec<SkillCell> {
    registry
        .iter()
        .map(|skill| SkillCell {
            key: skill.kind().key().to_string(),
            icon: skill.icon().to_string(),
            glyph: glyph(skill.icon()).to_string(),
            level: skill.level(),
            xp: skill.xp(),
            name: show_skill_names.then(|| skill.name().to_string()),
            tooltip: format!("{}\n{}", skill.kind().description(), format_xp(skill.xp())),
            xp_to_next: xp_to_next_level(skill.xp()),
        })
        .collect()
}

/// Lay cells out as a bordered text grid.
pub fn render_grid(cells: &[SkillCell], detailed: bool) -> String {
    let mut lines = Vec::new();

    for row in cells.chunks(COLUMNS) {
        let border = format!("+{}", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(row.len()));
        if lines.is_empty() {
            lines.push(border.clone());
        }

        lines.push(row_line(row.iter().map(|c| c.glyph.clone())));
        lines.push(row_line(row.iter().map(|c| format!("Lv {}", c.level))));
        if row.iter().any(|c| c.name.is_some()) {
            lines.push(row_line(
                row.iter().map(|c| c.name.clone().unwrap_or_default()),
            ));
        }
        lines.push(border);
    }

    if detailed {
        lines.push(String::new());
        for cell in cells {
            let description = cell.tooltip.lines().next().unwrap_or_default();
            lines.push(format!(
                "{} {} ({}, {} to next level)",
                cell.glyph,
                description,
                format_xp(cell.xp),
                cell.xp_to_next
            ));
        }
    }

    lines.join("\n")
}

fn row_line(values: impl Iterator<Item = String>) -> String {
    let mut line = String::from("|");
    for value in values {
        let value: String = value.chars().take(CELL_WIDTH).collect();
        line.push_str(&format!("{:^width$}|", value, width = CELL_WIDTH));
    }
    line
}

/// A stats grid writing each frame to a sink (stdout in the CLI).
pub struct StatsView {
    sink: Box<dyn Write + Send>,
    detailed: bool,
}

impl StatsView {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            detailed: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Append the tooltip legend under the grid.
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }
}

impl View for StatsView {
    fn view_type(&self) -> &'static str {
        STATS_VIEW_TYPE
    }

    fn render(&mut self, registry: &SkillRegistry, settings: &Settings) -> Result<()> {
        let frame = render_grid(
            &build_cells(registry, settings.show_skill_names),
            self.detailed,
        );
        writeln!(self.sink, "{}\n", frame)
            .and_then(|_| self.sink.flush())
            .map_err(|e| VaultXpError::view(format!("failed to draw stats grid: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::xp_threshold;
    use crate::skills::SkillKind;

    fn sample_registry() -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        registry.apply(&[
            (SkillKind::Scribe, xp_threshold(3)),
            (SkillKind::Hoarder, 1_234),
        ]);
        registry
    }

    #[test]
    fn test_format_xp() {
        assert_eq!(format_xp(0), "0 XP");
        assert_eq!(format_xp(999), "999 XP");
        assert_eq!(format_xp(1_234), "1,234 XP");
        assert_eq!(format_xp(1_234_567), "1,234,567 XP");
    }

    #[test]
    fn test_one_cell_per_skill() {
        let cells = build_cells(&sample_registry(), true);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].key, "scribe");
        assert_eq!(cells[0].level, 3);
        assert_eq!(cells[0].glyph, "✎");
        assert_eq!(cells[7].key, "totalLevel");
    }

    #[test]
    fn test_tooltip_has_description_and_xp() {
        let cells = build_cells(&sample_registry(), false);
        let hoarder = cells.iter().find(|c| c.key == "hoarder").unwrap();
        assert!(hoarder.tooltip.contains("every file"));
        assert!(hoarder.tooltip.contains("1,234 XP"));
    }

    #[test]
    fn test_names_hidden() {
        let registry = sample_registry();
        let cells = build_cells(&registry, false);
        assert!(cells.iter().all(|c| c.name.is_none()));

        let grid = render_grid(&cells, false);
        assert!(!grid.contains("Scribe"));
        assert!(grid.contains("Lv 3"));
    }

    #[test]
    fn test_names_shown() {
        let grid = render_grid(&build_cells(&sample_registry(), true), false);
        assert!(grid.contains("Scribe"));
        assert!(grid.contains("Total Level"));
    }

    #[test]
    fn test_toggle_round_trip_renders_identically() {
        let registry = sample_registry();
        let before = render_grid(&build_cells(&registry, true), true);
        let hidden = render_grid(&build_cells(&registry, false), true);
        let after = render_grid(&build_cells(&registry, true), true);

        assert_ne!(before, hidden);
        assert_eq!(before, after);
    }

    #[test]
    fn test_grid_rows_are_aligned() {
        let grid = render_grid(&build_cells(&sample_registry(), true), false);
        let widths: Vec<usize> = grid.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]));
        // Two rows of four: border, glyph, level, name, border per row, shared top.
        assert_eq!(grid.lines().count(), 9);
    }

    #[test]
    fn test_detailed_adds_legend() {
        let grid = render_grid(&build_cells(&sample_registry(), false), true);
        assert!(grid.contains("1,234 XP"));
        assert!(grid.contains("to next level"));
    }

    #[test]
    fn test_cell_json_omits_hidden_name() {
        let cells = build_cells(&sample_registry(), false);
        let json = serde_json::to_value(&cells[0]).unwrap();
        assert!(json.get("name").is_none());
        assert!(json.get("xp_to_next").is_none());
        assert_eq!(json["level"], 3);
    }
}
