/// Launcher sources — every game library location the scanner knows about.
///
/// The set is closed: eleven sources, always reported in the same order.
/// Custom folders are ordinary variants so that the discovery strategy for
/// each source is a plain `match`, not a runtime lookup.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One game-distribution platform or user-defined folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LauncherSource {
    Steam,
    Ea,
    Ubisoft,
    Epic,
    Gog,
    BattleNet,
    Xbox,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
}

/// How a source's scan roots are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Configured or registry install path, expanded through `libraryfolders.vdf`.
    SteamManifest,
    /// Configured or registry install path with a fixed `games` subfolder.
    UbisoftGames,
    /// A single user-configured folder, used only if it exists.
    ConfiguredFolder,
}

impl LauncherSource {
    /// Every source, in the stable order used when merging results.
    pub const ALL: [LauncherSource; 11] = [
        Self::Steam,
        Self::Ea,
        Self::Ubisoft,
        Self::Epic,
        Self::Gog,
        Self::BattleNet,
        Self::Xbox,
        Self::Custom1,
        Self::Custom2,
        Self::Custom3,
        Self::Custom4,
    ];

    /// Human-readable label, also used as the key in serialised results.
    pub fn label(self) -> &'static str {
        match self {
            Self::Steam => "Steam",
            Self::Ea => "EA Launcher",
            Self::Ubisoft => "Ubisoft Launcher",
            Self::Epic => "Epic Games Launcher",
            Self::Gog => "GOG Launcher",
            Self::BattleNet => "Battle.net Launcher",
            Self::Xbox => "Xbox Launcher",
            Self::Custom1 => "Custom Folder 1",
            Self::Custom2 => "Custom Folder 2",
            Self::Custom3 => "Custom Folder 3",
            Self::Custom4 => "Custom Folder 4",
        }
    }

    /// Key under which the source's install path is stored in the settings file.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::Ea => "ea",
            Self::Ubisoft => "ubisoft",
            Self::Epic => "epic",
            Self::Gog => "gog",
            Self::BattleNet => "battlenet",
            Self::Xbox => "xbox",
            Self::Custom1 => "custom1",
            Self::Custom2 => "custom2",
            Self::Custom3 => "custom3",
            Self::Custom4 => "custom4",
        }
    }

    /// Inverse of [`LauncherSource::config_key`].
    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.config_key() == key)
    }

    pub fn strategy(self) -> DiscoveryStrategy {
        match self {
            Self::Steam => DiscoveryStrategy::SteamManifest,
            Self::Ubisoft => DiscoveryStrategy::UbisoftGames,
            Self::Ea
            | Self::Epic
            | Self::Gog
            | Self::BattleNet
            | Self::Xbox
            | Self::Custom1
            | Self::Custom2
            | Self::Custom3
            | Self::Custom4 => DiscoveryStrategy::ConfiguredFolder,
        }
    }
}

impl fmt::Display for LauncherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
