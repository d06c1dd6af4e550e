//! Settings storage traits for vaultxp.
//!
//! This module defines the `SettingsStore` trait for settings persistence.

use std::sync::Arc;

use crate::error::{FailOpen, Result};
use crate::settings::Settings;

/// Trait for settings storage backends.
///
/// The store holds a single settings blob: user preferences together with
/// the last persisted skill snapshot.
pub trait SettingsStore: Send + Sync {
    /// Load the stored settings.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Settings>>;

    /// Replace the stored settings.
    fn save(&self, settings: &Settings) -> Result<()>;

    /// Load the stored settings merged over defaults.
    ///
    /// Missing or unreadable data yields [`Settings::default`].
    fn load_or_default(&self) -> Settings {
        self.load()
            .map(Option::unwrap_or_default)
            .fail_open_default("loading settings")
    }
}

/// Blanket implementation of SettingsStore for Arc-wrapped stores.
///
/// This allows sharing one store between a controller and a test.
impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn load(&self) -> Result<Option<Settings>> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings)
    }
}
