//! The fixed registry of skills and its persisted snapshot form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::level::xp_threshold;
use crate::skills::{Skill, SkillKind};

/// Persisted form of one skill inside `savedSkills`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SavedSkill {
    pub name: String,
    pub xp: u64,
    pub icon: String,
}

/// Persisted `savedSkills` map, keyed by [`SkillKind::key`].
pub type SkillSnapshot = BTreeMap<String, SavedSkill>;

/// All eight skills, always present, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRegistry {
    skills: Vec<Skill>,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self {
            skills: SkillKind::ALL.into_iter().map(Skill::new).collect(),
        }
    }
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from a persisted snapshot.
    ///
    /// Unknown keys are ignored and missing keys keep their defaults. Levels
    /// are recomputed from the stored xp, never read from disk.
    pub fn from_snapshot(snapshot: &SkillSnapshot) -> Self {
        let mut registry = Self::default();
        for (key, saved) in snapshot {
            let Some(kind) = SkillKind::from_key(key) else {
                tracing::debug!(key = %key, "ignoring unknown skill in saved snapshot");
                continue;
            };
            registry.skills[kind as usize] =
                Skill::with_xp(kind, saved.xp).with_appearance(&saved.name, &saved.icon);
        }
        registry
    }

    /// Persisted form of the current registry.
    pub fn snapshot(&self) -> SkillSnapshot {
        self.skills
            .iter()
            .map(|skill| {
                (
                    skill.kind().key().to_string(),
                    SavedSkill {
                        name: skill.name().to_string(),
                        xp: skill.xp(),
                        icon: skill.icon().to_string(),
                    },
                )
            })
            .collect()
    }

    pub fn get(&self, kind: SkillKind) -> &Skill {
        &self.skills[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Assign freshly computed xp values and recompute the total level.
    ///
    /// Entries for [`SkillKind::TotalLevel`] are ignored; it is always derived.
    pub fn apply(&mut self, results: &[(SkillKind, u64)]) {
        for &(kind, xp) in results {
            if kind == SkillKind::TotalLevel {
                continue;
            }
            self.skills[kind as usize].set_xp(xp);
        }
        self.recompute_total_level();
    }

    /// Sum of the computed skills' levels.
    pub fn combined_level(&self) -> u32 {
        SkillKind::COMPUTED
            .iter()
            .map(|&kind| self.get(kind).level())
            .sum()
    }

    /// Set Total Level's xp to the threshold of the combined level.
    pub fn recompute_total_level(&mut self) {
        let xp = xp_threshold(self.combined_level());
        self.skills[SkillKind::TotalLevel as usize].set_xp(xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::level_for_xp;

    #[test]
    fn test_default_registry_has_every_skill() {
        let registry = SkillRegistry::new();
        assert_eq!(registry.len(), 8);
        let kinds: Vec<SkillKind> = registry.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, SkillKind::ALL.to_vec());
        assert!(registry.iter().all(|s| s.xp() == 0 && s.level() == 0));
    }

    #[test]
    fn test_total_level_from_computed_levels() {
        let levels = [2u32, 3, 1, 4, 0, 5, 2];
        let results: Vec<(SkillKind, u64)> = SkillKind::COMPUTED
            .iter()
            .zip(levels)
            .map(|(&kind, level)| (kind, xp_threshold(level)))
            .collect();

        let mut registry = SkillRegistry::new();
        registry.apply(&results);

        let total = registry.get(SkillKind::TotalLevel);
        assert_eq!(registry.combined_level(), 17);
        assert_eq!(total.xp(), xp_threshold(17));
        assert_eq!(total.level(), 17);
        assert_eq!(total.level(), level_for_xp(total.xp()));
    }

    #[test]
    fn test_apply_ignores_total_level_input() {
        let mut registry = SkillRegistry::new();
        registry.apply(&[(SkillKind::TotalLevel, 99_999)]);
        assert_eq!(registry.get(SkillKind::TotalLevel).xp(), 0);
        assert_eq!(registry.get(SkillKind::TotalLevel).level(), 0);
    }

    #[test]
    fn test_apply_replaces_rather_than_accumulates() {
        let mut registry = SkillRegistry::new();
        registry.apply(&[(SkillKind::Archivist, 24)]);
        registry.apply(&[(SkillKind::Archivist, 16)]);
        assert_eq!(registry.get(SkillKind::Archivist).xp(), 16);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut registry = SkillRegistry::new();
        registry.apply(&[(SkillKind::Scribe, 120), (SkillKind::Hoarder, 400)]);

        let restored = SkillRegistry::from_snapshot(&registry.snapshot());
        assert_eq!(restored, registry);
    }

    #[test]
    fn test_from_snapshot_recomputes_levels_and_skips_unknown_keys() {
        let mut snapshot = SkillSnapshot::new();
        snapshot.insert(
            "connector".to_string(),
            SavedSkill {
                name: "Connector".to_string(),
                xp: xp_threshold(4),
                icon: "link".to_string(),
            },
        );
        snapshot.insert(
            "juggler".to_string(),
            SavedSkill {
                name: "Juggler".to_string(),
                xp: 10,
                icon: "ball".to_string(),
            },
        );

        let registry = SkillRegistry::from_snapshot(&snapshot);
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get(SkillKind::Connector).level(), 4);
        assert_eq!(registry.get(SkillKind::Scribe).xp(), 0);
        assert!(registry.iter().all(|s| s.name() != "Juggler"));
    }

    #[test]
    fn test_snapshot_uses_persisted_keys() {
        let snapshot = SkillRegistry::new().snapshot();
        assert!(snapshot.contains_key("totalLevel"));
        assert!(snapshot.contains_key("taskmaster"));
        assert_eq!(snapshot.len(), 8);
    }
}
