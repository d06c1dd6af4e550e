//! The skill entity and its fixed set of kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level::level_for_xp;

/// Identifies one of the eight progression tracks.
///
/// The declaration order is the display order of the stats grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillKind {
    Scribe,
    Archivist,
    Hoarder,
    Curator,
    Connector,
    Taskmaster,
    Researcher,
    TotalLevel,
}

impl SkillKind {
    /// Every skill, in display order.
    pub const ALL: [SkillKind; 8] = [
        SkillKind::Scribe,
        SkillKind::Archivist,
        SkillKind::Hoarder,
        SkillKind::Curator,
        SkillKind::Connector,
        SkillKind::Taskmaster,
        SkillKind::Researcher,
        SkillKind::TotalLevel,
    ];

    /// The skills whose xp comes from a vault scan.
    pub const COMPUTED: [SkillKind; 7] = [
        SkillKind::Scribe,
        SkillKind::Archivist,
        SkillKind::Hoarder,
        SkillKind::Curator,
        SkillKind::Connector,
        SkillKind::Taskmaster,
        SkillKind::Researcher,
    ];

    /// Key used in the persisted `savedSkills` map.
    pub fn key(self) -> &'static str {
        match self {
            SkillKind::Scribe => "scribe",
            SkillKind::Archivist => "archivist",
            SkillKind::Hoarder => "hoarder",
            SkillKind::Curator => "curator",
            SkillKind::Connector => "connector",
            SkillKind::Taskmaster => "taskmaster",
            SkillKind::Researcher => "researcher",
            SkillKind::TotalLevel => "totalLevel",
        }
    }

    /// Look up a kind by its persisted key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SkillKind::Scribe => "Scribe",
            SkillKind::Archivist => "Archivist",
            SkillKind::Hoarder => "Hoarder",
            SkillKind::Curator => "Curator",
            SkillKind::Connector => "Connector",
            SkillKind::Taskmaster => "Taskmaster",
            SkillKind::Researcher => "Researcher",
            SkillKind::TotalLevel => "Total Level",
        }
    }

    /// Symbolic icon name, resolved to a glyph by the view.
    pub fn default_icon(self) -> &'static str {
        match self {
            SkillKind::Scribe => "pencil",
            SkillKind::Archivist => "archive",
            SkillKind::Hoarder => "package",
            SkillKind::Curator => "image",
            SkillKind::Connector => "link",
            SkillKind::Taskmaster => "check-square",
            SkillKind::Researcher => "hash",
            SkillKind::TotalLevel => "trophy",
        }
    }

    /// What earns xp for this skill, shown in the tooltip.
    pub fn description(self) -> &'static str {
        match self {
            SkillKind::Scribe => "One xp for every hundred words in a note",
            SkillKind::Archivist => "Eight xp for every note in the vault",
            SkillKind::Hoarder => "Eight xp for every file in the vault",
            SkillKind::Curator => "Five xp for every attachment that is not a note",
            SkillKind::Connector => "One xp for every [[internal link]]",
            SkillKind::Taskmaster => "One xp for every completed task",
            SkillKind::Researcher => "One xp for every distinct #tag",
            SkillKind::TotalLevel => "Combined level of every other skill",
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One progression track.
///
/// `level` is always `level_for_xp(xp)`; xp can only change through
/// [`Skill::set_xp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    kind: SkillKind,
    name: String,
    icon: String,
    xp: u64,
    level: u32,
}

impl Skill {
    /// A fresh skill with zero xp.
    pub fn new(kind: SkillKind) -> Self {
        Self::with_xp(kind, 0)
    }

    pub fn with_xp(kind: SkillKind, xp: u64) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            icon: kind.default_icon().to_string(),
            xp,
            level: level_for_xp(xp),
        }
    }

    /// Override the display name and icon, keeping defaults for empty values.
    pub fn with_appearance(mut self, name: &str, icon: &str) -> Self {
        if !name.trim().is_empty() {
            self.name = name.to_string();
        }
        if !icon.trim().is_empty() {
            self.icon = icon.to_string();
        }
        self
    }

    pub fn kind(&self) -> SkillKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Replace the xp and recompute the level.
    pub fn set_xp(&mut self, xp: u64) {
        self.xp = xp;
        self.level = level_for_xp(xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::xp_threshold;

    #[test]
    fn test_new_skill_is_level_zero() {
        let skill = Skill::new(SkillKind::Scribe);
        assert_eq!(skill.xp(), 0);
        assert_eq!(skill.level(), 0);
        assert_eq!(skill.name(), "Scribe");
        assert_eq!(skill.icon(), "pencil");
    }

    #[test]
    fn test_set_xp_recomputes_level() {
        let mut skill = Skill::new(SkillKind::Connector);
        skill.set_xp(xp_threshold(3));
        assert_eq!(skill.level(), 3);

        skill.set_xp(10);
        assert_eq!(skill.level(), 0);
    }

    #[test]
    fn test_with_xp_derives_level() {
        let skill = Skill::with_xp(SkillKind::Hoarder, xp_threshold(7) + 1);
        assert_eq!(skill.level(), 7);
    }

    #[test]
    fn test_with_appearance_ignores_blank_values() {
        let skill = Skill::new(SkillKind::Curator).with_appearance("  ", "");
        assert_eq!(skill.name(), "Curator");
        assert_eq!(skill.icon(), "image");

        let skill = Skill::new(SkillKind::Curator).with_appearance("Gallery", "camera");
        assert_eq!(skill.name(), "Gallery");
        assert_eq!(skill.icon(), "camera");
    }

    #[test]
    fn test_key_round_trip() {
        for kind in SkillKind::ALL {
            assert_eq!(SkillKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(SkillKind::from_key("juggler"), None);
    }

    #[test]
    fn test_serde_uses_persisted_keys() {
        let json = serde_json::to_string(&SkillKind::TotalLevel).unwrap();
        assert_eq!(json, "\"totalLevel\"");
    }

    #[test]
    fn test_computed_excludes_total_level() {
        assert_eq!(SkillKind::COMPUTED.len(), 7);
        assert!(!SkillKind::COMPUTED.contains(&SkillKind::TotalLevel));
    }
}
