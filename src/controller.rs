//! The controller owns every piece of runtime state.
//!
//! One cycle clears the content cache, runs the seven calculators
//! concurrently, applies their results to the registry, persists the
//! snapshot and redraws the open views. A failed cycle changes nothing.
//!
//! [`Controller::run`] drives cycles from a timer and applies live settings
//! commands between them. Cycles run inline in the loop so they never
//! overlap; ticks missed while a cycle is running are skipped.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::error::Result;
use crate::settings::{Settings, SettingsStore};
use crate::skills::{compute_all, SkillKind, SkillRegistry};
use crate::vault::{ContentCache, Vault};
use crate::view::{View, Workspace, STATS_VIEW_TYPE};

/// A settings change or request fed to a running controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    SetShowSkillNames(bool),
    ToggleShowSkillNames,
    /// Raw interval input in minutes; invalid input falls back to the default.
    SetUpdateInterval(String),
    /// Run a cycle now.
    Refresh,
    /// Redraw the open views without recomputing.
    Render,
    Quit,
}

/// Per-skill line of a [`CycleReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillReport {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub xp: u64,
    pub level: u32,
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Every skill after the cycle, Total Level last.
    pub skills: Vec<SkillReport>,
    pub total_level: u32,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
    /// Whether the snapshot reached the settings store.
    pub persisted: bool,
}

impl CycleReport {
    fn new(registry: &SkillRegistry, elapsed: Duration, persisted: bool) -> Self {
        Self {
            skills: registry
                .iter()
                .map(|skill| SkillReport {
                    key: skill.kind().key().to_string(),
                    name: skill.name().to_string(),
                    icon: skill.icon().to_string(),
                    xp: skill.xp(),
                    level: skill.level(),
                })
                .collect(),
            total_level: registry.get(SkillKind::TotalLevel).level(),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            completed_at: Utc::now(),
            persisted,
        }
    }
}

/// Composition root for one vault.
pub struct Controller<V: Vault, S: SettingsStore> {
    vault: V,
    store: S,
    settings: Settings,
    registry: SkillRegistry,
    cache: ContentCache,
    workspace: Workspace,
    cycles: u64,
}

impl<V: Vault, S: SettingsStore> Controller<V, S> {
    /// Load settings (defaults on any failure) and rebuild the registry from
    /// the persisted snapshot.
    pub fn load(vault: V, store: S) -> Self {
        let settings = store.load_or_default();
        let registry = match &settings.saved_skills {
            Some(snapshot) => SkillRegistry::from_snapshot(snapshot),
            None => SkillRegistry::new(),
        };
        tracing::debug!(
            show_skill_names = settings.show_skill_names,
            update_interval = settings.update_interval,
            restored = settings.saved_skills.is_some(),
            "controller loaded"
        );

        Self {
            vault,
            store,
            settings,
            registry,
            cache: ContentCache::new(),
            workspace: Workspace::new(),
            cycles: 0,
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Number of successful cycles since load.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one full cycle.
    ///
    /// On a calculator error the registry and the store are left untouched
    /// and the error is returned.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let started = Instant::now();
        self.cache.clear().await;

        let results = match compute_all(&self.vault, &self.cache).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "skill update failed, keeping previous values");
                return Err(e);
            }
        };

        self.registry.apply(&results);
        self.settings.saved_skills = Some(self.registry.snapshot());
        let persisted = self.persist();
        self.workspace.refresh(&self.registry, &self.settings);
        self.cycles += 1;

        let report = CycleReport::new(&self.registry, started.elapsed(), persisted);
        let stats = self.cache.stats();
        tracing::info!(
            total_level = report.total_level,
            duration_ms = report.duration_ms,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            persisted,
            "skills updated"
        );
        Ok(report)
    }

    /// Run a cycle, logging instead of returning a failure.
    pub async fn refresh(&mut self) -> Option<CycleReport> {
        self.run_cycle().await.ok()
    }

    pub fn set_show_skill_names(&mut self, show: bool) -> Result<()> {
        self.settings.show_skill_names = show;
        self.workspace.refresh(&self.registry, &self.settings);
        self.save_settings()
    }

    pub fn toggle_show_skill_names(&mut self) -> Result<()> {
        self.set_show_skill_names(!self.settings.show_skill_names)
    }

    /// Apply raw interval input and persist it.
    ///
    /// Returns the effective interval in minutes. The caller restarts its
    /// timer with [`Settings::update_period`].
    pub fn set_update_interval(&mut self, raw: &str) -> Result<u64> {
        let minutes = self.settings.set_update_interval(raw);
        self.save_settings()?;
        Ok(minutes)
    }

    /// Redraw every open view from the current state.
    pub fn render(&mut self) {
        self.workspace.refresh(&self.registry, &self.settings);
    }

    /// Reveal the open stats view, or open the one built by `make`.
    pub fn open_stats_view(&mut self, make: impl FnOnce() -> Box<dyn View>) {
        if self
            .workspace
            .reveal(STATS_VIEW_TYPE, &self.registry, &self.settings)
        {
            return;
        }
        tracing::debug!(view_type = STATS_VIEW_TYPE, "no open view to reveal, opening one");
        self.workspace.open(make(), &self.registry, &self.settings);
    }

    /// Write the current settings, including the skill snapshot.
    pub fn save_settings(&self) -> Result<()> {
        self.store.save(&self.settings)
    }

    fn persist(&self) -> bool {
        match self.save_settings() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist skills");
                false
            }
        }
    }

    /// Run cycles on the update interval until `shutdown` resolves, a
    /// [`ControlCommand::Quit`] arrives or the command channel closes.
    ///
    /// The first cycle runs before any command is read; the next one is a
    /// full period later.
    pub async fn run<F>(&mut self, mut commands: mpsc::Receiver<ControlCommand>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.refresh().await;
        let mut ticker = ticker_after(self.settings.update_period());

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::debug!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("command channel closed");
                        break;
                    };
                    match self.apply(command).await {
                        Applied::Continue => {}
                        Applied::RestartTimer(period) => {
                            ticker = ticker_after(period);
                            tracing::debug!(period_secs = period.as_secs(), "timer restarted");
                        }
                        Applied::Stop => break,
                    }
                }
            }
        }

        self.shutdown().await;
    }

    async fn apply(&mut self, command: ControlCommand) -> Applied {
        let (saved, applied) = match command {
            ControlCommand::SetShowSkillNames(show) => {
                (self.set_show_skill_names(show), Applied::Continue)
            }
            ControlCommand::ToggleShowSkillNames => {
                (self.toggle_show_skill_names(), Applied::Continue)
            }
            ControlCommand::SetUpdateInterval(raw) => {
                let saved = self.set_update_interval(&raw).map(|_| ());
                (saved, Applied::RestartTimer(self.settings.update_period()))
            }
            ControlCommand::Refresh => {
                self.refresh().await;
                (Ok(()), Applied::Continue)
            }
            ControlCommand::Render => {
                self.render();
                (Ok(()), Applied::Continue)
            }
            ControlCommand::Quit => (Ok(()), Applied::Stop),
        };
        if let Err(e) = saved {
            tracing::warn!(error = %e, "failed to save settings");
        }
        applied
    }

    /// Drop cached text and close every view.
    pub async fn shutdown(&mut self) {
        self.cache.clear().await;
        self.workspace.detach_all();
        tracing::debug!(cycles = self.cycles, "controller stopped");
    }
}

/// What the run loop does after a command.
enum Applied {
    Continue,
    RestartTimer(Duration),
    Stop,
}

/// A timer whose first tick is one full period away.
fn ticker_after(period: Duration) -> Interval {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
