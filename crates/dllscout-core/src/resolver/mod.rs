/// Path resolution — turns a [`LauncherSource`] into the root folders to scan.
///
/// Resolution never fails: an uninstalled launcher, an unset or missing
/// folder, or an unreadable manifest all produce fewer (or zero) roots and
/// a debug log line.
///
/// Steam and Ubisoft prefer the configured install path and otherwise ask
/// the [`InstallLocator`]; a path found that way is written back to the
/// [`ConfigStore`] so later scans skip the lookup.
pub mod manifest;

pub use manifest::{parse_library_folders, read_library_manifest};

use crate::config::ConfigStore;
use crate::model::{DiscoveryStrategy, LauncherSource};
use crate::platform::{InstallLocator, RegistryKey};
use std::path::{Path, PathBuf};
use tracing::debug;

const STEAMAPPS_COMMON: &str = "steamapps/common";

/// Remove a trailing `steamapps/common` (either separator, any case) that a
/// user may have pasted into the Steam path setting.
pub fn strip_steamapps_common(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['\\', '/']);
    let normalised = trimmed.to_ascii_lowercase().replace('\\', "/");
    let cut = trimmed.len().saturating_sub(STEAMAPPS_COMMON.len());
    let on_boundary = cut == 0 || matches!(trimmed.as_bytes()[cut - 1], b'\\' | b'/');
    if normalised.ends_with(STEAMAPPS_COMMON) && on_boundary {
        let base = trimmed[..cut].trim_end_matches(['\\', '/']);
        // Keep a bare drive or root such as "C:\" usable.
        if base.is_empty() || base.ends_with(':') {
            return &trimmed[..cut];
        }
        return base;
    }
    trimmed
}

/// Per-launcher root discovery.
pub struct PathResolver<'a> {
    config: &'a dyn ConfigStore,
    locator: &'a dyn InstallLocator,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a dyn ConfigStore, locator: &'a dyn InstallLocator) -> Self {
        Self { config, locator }
    }

    /// Root folders to scan for `source`, possibly none.
    pub fn resolve(&self, source: LauncherSource) -> Vec<PathBuf> {
        match source.strategy() {
            DiscoveryStrategy::SteamManifest => match self.steam_install_path() {
                Some(install) => steam_libraries(&install),
                None => Vec::new(),
            },
            DiscoveryStrategy::UbisoftGames => match self.ubisoft_install_path() {
                Some(install) => existing(source, install.join("games")),
                None => Vec::new(),
            },
            DiscoveryStrategy::ConfiguredFolder => match self.config.launcher_path(source) {
                Some(path) => existing(source, PathBuf::from(path)),
                None => {
                    debug!("No folder configured for {source}");
                    Vec::new()
                }
            },
        }
    }

    pub fn steam_install_path(&self) -> Option<PathBuf> {
        if let Some(configured) = self.config.launcher_path(LauncherSource::Steam) {
            let path = strip_steamapps_common(&configured);
            debug!("Using configured Steam path: {path}");
            return Some(PathBuf::from(path));
        }
        self.discover(LauncherSource::Steam, RegistryKey::Steam)
    }

    pub fn ubisoft_install_path(&self) -> Option<PathBuf> {
        if let Some(configured) = self.config.launcher_path(LauncherSource::Ubisoft) {
            return Some(PathBuf::from(configured));
        }
        self.discover(LauncherSource::Ubisoft, RegistryKey::Ubisoft)
    }

    /// Registry lookup with write-back to the config store.
    fn discover(&self, source: LauncherSource, key: RegistryKey) -> Option<PathBuf> {
        match self.locator.install_path(key) {
            Some(path) => {
                debug!("Discovered {source} install path: {}", path.display());
                self.config
                    .set_launcher_path(source, &path.to_string_lossy());
                Some(path)
            }
            None => {
                debug!("Could not find {source} install path");
                None
            }
        }
    }
}

/// Library roots for a Steam install, falling back to `<install>/steamapps/common`.
fn steam_libraries(install: &Path) -> Vec<PathBuf> {
    debug!("Looking for Steam libraries in: {}", install.display());
    let steamapps = install.join("steamapps");
    let libraries = read_library_manifest(&steamapps.join("libraryfolders.vdf"));
    if libraries.is_empty() {
        let default_path = steamapps.join("common");
        debug!(
            "No libraries listed in libraryfolders.vdf, using default path: {}",
            default_path.display()
        );
        return vec![default_path];
    }
    libraries
}

fn existing(source: LauncherSource, path: PathBuf) -> Vec<PathBuf> {
    if path.exists() {
        vec![path]
    } else {
        debug!("{source} folder {} does not exist", path.display());
        Vec::new()
    }
}
