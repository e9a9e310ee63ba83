/// Platform-specific functionality — launcher install-path discovery.
///
/// On Windows, install paths come from the registry; on every other target
/// the system locator reports nothing and only configured paths are used.
#[cfg(windows)]
pub mod registry;

use std::path::PathBuf;

/// Fixed vendor/product keys the scanner knows how to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Steam,
    Ubisoft,
}

impl RegistryKey {
    /// Subkey under `HKEY_LOCAL_MACHINE`.
    pub fn subkey(self) -> &'static str {
        match self {
            Self::Steam => r"SOFTWARE\WOW6432Node\Valve\Steam",
            Self::Ubisoft => r"SOFTWARE\WOW6432Node\Ubisoft\Launcher",
        }
    }

    pub fn value_name(self) -> &'static str {
        match self {
            Self::Steam => "InstallPath",
            Self::Ubisoft => "InstallDir",
        }
    }
}

/// Registry-style install-path lookup.
///
/// `None` means "not installed"; implementations must never treat a missing
/// key as an error.
pub trait InstallLocator: Send + Sync {
    fn install_path(&self, key: RegistryKey) -> Option<PathBuf>;
}

/// The host system's locator: the Windows registry, or nothing elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocator;

impl InstallLocator for SystemLocator {
    #[cfg(windows)]
    fn install_path(&self, key: RegistryKey) -> Option<PathBuf> {
        registry::read_install_path(key)
    }

    #[cfg(not(windows))]
    fn install_path(&self, key: RegistryKey) -> Option<PathBuf> {
        tracing::debug!("No registry on this platform, skipping {}", key.subkey());
        None
    }
}

/// A locator that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocator;

impl InstallLocator for NoLocator {
    fn install_path(&self, _key: RegistryKey) -> Option<PathBuf> {
        None
    }
}
