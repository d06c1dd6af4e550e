//! The persisted settings blob.
//!
//! Stored as camelCase JSON so the layout matches the plugin data file:
//! `{ "showSkillNames": .., "updateInterval": .., "savedSkills": { .. } }`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::skills::SkillSnapshot;

/// Minutes between refresh cycles when nothing valid is configured.
pub const DEFAULT_UPDATE_INTERVAL: u64 = 5;

/// Longest accepted interval: one week. Larger values are clamped to it.
pub const MAX_UPDATE_INTERVAL: u64 = 7 * 24 * 60;

/// User preferences plus the last persisted skill snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Show skill names under each grid cell.
    pub show_skill_names: bool,
    /// Minutes between refresh cycles, in `1..=MAX_UPDATE_INTERVAL`.
    #[serde(deserialize_with = "deserialize_update_interval")]
    pub update_interval: u64,
    /// Skills as of the last successful cycle; absent on first run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_skills: Option<SkillSnapshot>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_skill_names: true,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            saved_skills: None,
        }
    }
}

impl Settings {
    /// Apply raw user input to the interval, returning the effective value.
    ///
    /// Non-numeric or non-positive input falls back to the default; values
    /// above [`MAX_UPDATE_INTERVAL`] are clamped.
    pub fn set_update_interval(&mut self, raw: &str) -> u64 {
        self.update_interval = parse_update_interval(raw);
        self.update_interval
    }

    /// The refresh timer period.
    pub fn update_period(&self) -> Duration {
        Duration::from_secs(self.update_interval.clamp(1, MAX_UPDATE_INTERVAL) * 60)
    }
}

/// Parse an interval in minutes, falling back to [`DEFAULT_UPDATE_INTERVAL`].
pub fn parse_update_interval(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => clamp_update_interval(minutes as u64),
        _ => {
            tracing::debug!(input = raw, "invalid update interval, using default");
            DEFAULT_UPDATE_INTERVAL
        }
    }
}

fn clamp_update_interval(minutes: u64) -> u64 {
    if minutes > MAX_UPDATE_INTERVAL {
        tracing::debug!(minutes, "update interval too long, clamping");
    }
    minutes.min(MAX_UPDATE_INTERVAL)
}

/// Accept the interval as a number or a string; anything unusable is the default.
fn deserialize_update_interval<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(minutes), _) if minutes > 0 => clamp_update_interval(minutes),
            (None, Some(minutes)) if minutes >= 1.0 && minutes.is_finite() => {
                clamp_update_interval(minutes as u64)
            }
            _ => DEFAULT_UPDATE_INTERVAL,
        },
        Value::String(s) => parse_update_interval(&s),
        _ => DEFAULT_UPDATE_INTERVAL,
    })
}
