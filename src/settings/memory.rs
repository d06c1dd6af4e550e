//! In-memory settings storage for testing.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::{Result, VaultXpError};
use crate::settings::{Settings, SettingsStore};

/// In-memory settings store.
///
/// Counts saves and can be switched into a failing mode to exercise the
/// controller's persistence error paths.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Option<Settings>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
            ..Self::default()
        }
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The currently stored settings, if any.
    pub fn current(&self) -> Option<Settings> {
        self.settings.read().unwrap().clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.settings.read().unwrap().clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(VaultXpError::storage(
                "<memory>",
                io::Error::new(io::ErrorKind::PermissionDenied, "settings store is read-only"),
            ));
        }
        *self.settings.write().unwrap() = Some(settings.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::traits::tests::test_settings_store_round_trip;

    #[test]
    fn test_memory_settings_store_round_trip() {
        let store = MemorySettingsStore::new();
        test_settings_store_round_trip(&store);
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_failing_saves_keep_previous_value() {
        let store = MemorySettingsStore::with_settings(Settings::default());
        store.set_fail_saves(true);

        let changed = Settings {
            update_interval: 60,
            ..Settings::default()
        };
        assert!(store.save(&changed).is_err());
        assert_eq!(store.current(), Some(Settings::default()));
        assert_eq!(store.save_count(), 0);
    }
}
