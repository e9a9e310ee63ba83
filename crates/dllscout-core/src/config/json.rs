/// JSON-file backed [`ConfigStore`].
///
/// The whole [`Settings`] struct is held in memory behind a lock and the
/// file is rewritten after every `set_launcher_path`. A missing file loads
/// as defaults; it is created on the first write.
use super::{ConfigStore, Settings};
use crate::error::ConfigError;
use crate::model::{LauncherSource, Technology};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct JsonConfigStore {
    path: PathBuf,
    settings: RwLock<Settings>,
}

impl JsonConfigStore {
    /// Load settings from `path`, falling back to defaults if the file does
    /// not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {} not found, using defaults", path.display());
                Settings::default()
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Ok(Self {
            path,
            settings: RwLock::new(settings),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Write the current settings to disk.
    ///
    /// Holds the write lock for the duration so concurrent saves never
    /// interleave on the file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let settings = self.settings.write();
        write_settings(&self.path, &settings)
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(settings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl ConfigStore for JsonConfigStore {
    fn launcher_path(&self, source: LauncherSource) -> Option<String> {
        self.settings.read().launcher_path(source)
    }

    fn set_launcher_path(&self, source: LauncherSource, value: &str) {
        let mut settings = self.settings.write();
        settings.set_launcher_path(source, value);
        if let Err(err) = write_settings(&self.path, &settings) {
            warn!("Could not persist {} path: {err}", source);
        }
    }

    fn update_preference(&self, technology: Technology) -> bool {
        self.settings.read().preferences.is_enabled(technology)
    }
}
