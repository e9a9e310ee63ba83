/// Configuration store — launcher install paths and technology preferences.
///
/// The scanner never reads global state: a [`ConfigStore`] is passed in
/// explicitly. Two implementations are provided:
///
/// - [`MemoryConfig`] — in-memory settings, for embedding and tests.
/// - [`JsonConfigStore`] — settings persisted as JSON with write-through
///   on every path update.
pub mod json;

pub use json::JsonConfigStore;

use crate::model::{LauncherSource, Technology};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-mostly key/value view of the user's settings.
///
/// Implementations are shared across scan worker threads, hence `Send + Sync`.
pub trait ConfigStore: Send + Sync {
    /// Configured install path for `source`. Empty or blank values are `None`.
    fn launcher_path(&self, source: LauncherSource) -> Option<String>;

    /// Store a discovered install path for future scans.
    fn set_launcher_path(&self, source: LauncherSource, value: &str);

    /// Whether DLLs of `technology` should be searched for.
    fn update_preference(&self, technology: Technology) -> bool;
}

/// Per-technology update flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dlss: bool,
    pub direct_storage: bool,
    pub xess: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dlss: true,
            direct_storage: true,
            xess: true,
        }
    }
}

impl Preferences {
    /// Every technology switched off.
    pub fn none() -> Self {
        Self {
            dlss: false,
            direct_storage: false,
            xess: false,
        }
    }

    pub fn is_enabled(&self, technology: Technology) -> bool {
        match technology {
            Technology::Dlss => self.dlss,
            Technology::DirectStorage => self.direct_storage,
            Technology::Xess => self.xess,
        }
    }
}

/// Everything persisted in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Install paths keyed by [`LauncherSource::config_key`].
    pub launcher_paths: BTreeMap<String, String>,
    pub preferences: Preferences,
    /// Game folder names excluded from results.
    pub whitelist: Vec<String>,
}

impl Settings {
    pub fn launcher_path(&self, source: LauncherSource) -> Option<String> {
        self.launcher_paths
            .get(source.config_key())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn set_launcher_path(&mut self, source: LauncherSource, value: &str) {
        self.launcher_paths
            .insert(source.config_key().to_string(), value.to_string());
    }

    /// Builder-style helper used when assembling settings in code.
    pub fn with_launcher_path(mut self, source: LauncherSource, value: impl AsRef<str>) -> Self {
        self.set_launcher_path(source, value.as_ref());
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Settings held only in memory.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    settings: RwLock<Settings>,
}

impl MemoryConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }
}

impl ConfigStore for MemoryConfig {
    fn launcher_path(&self, source: LauncherSource) -> Option<String> {
        self.settings.read().launcher_path(source)
    }

    fn set_launcher_path(&self, source: LauncherSource, value: &str) {
        self.settings.write().set_launcher_path(source, value);
    }

    fn update_preference(&self, technology: Technology) -> bool {
        self.settings.read().preferences.is_enabled(technology)
    }
}
