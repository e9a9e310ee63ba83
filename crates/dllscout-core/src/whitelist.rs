/// Whitelist gate — decides whether a discovered DLL must be left out.
///
/// The scanner calls [`WhitelistGate::is_excluded`] exactly once per matching
/// file, on the worker thread scanning that launcher, so implementations may
/// do blocking I/O without stalling the caller. They must not modify the
/// filesystem and must not panic for a well-formed path.
use std::path::{Component, Path};

pub trait WhitelistGate: Send + Sync {
    fn is_excluded(&self, path: &Path) -> bool;

    /// Same question for a file found while walking `root`. Gates that only
    /// care about the game's own folders can ignore everything above `root`.
    fn is_excluded_under(&self, _root: &Path, path: &Path) -> bool {
        self.is_excluded(path)
    }
}

/// Gate that keeps everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWhitelist;

impl WhitelistGate for NoWhitelist {
    fn is_excluded(&self, _path: &Path) -> bool {
        false
    }
}

/// Excludes any path that passes through a folder with a whitelisted name.
///
/// Names compare case-insensitively against whole path components, so an
/// entry `Cyberpunk 2077` matches `D:\Games\Cyberpunk 2077\bin\x64\nvngx_dlss.dll`
/// but not `D:\Games\Cyberpunk 2077 Tools\...`. During a scan only the
/// folders below the library root are checked: an entry `Games` must not
/// hide a whole `D:\Games\SteamLibrary`.
#[derive(Debug, Default, Clone)]
pub struct FolderWhitelist {
    names: Vec<String>,
}

impl FolderWhitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn any_folder_matches(&self, folders: &Path) -> bool {
        folders.components().any(|c| match c {
            Component::Normal(name) => {
                let name = name.to_string_lossy().to_lowercase();
                self.names.iter().any(|n| *n == name)
            }
            _ => false,
        })
    }
}

impl WhitelistGate for FolderWhitelist {
    fn is_excluded(&self, path: &Path) -> bool {
        if self.names.is_empty() {
            return false;
        }
        path.parent()
            .is_some_and(|parent| self.any_folder_matches(parent))
    }

    fn is_excluded_under(&self, root: &Path, path: &Path) -> bool {
        if self.names.is_empty() {
            return false;
        }
        let Some(parent) = path.parent() else {
            return false;
        };
        match parent.strip_prefix(root) {
            Ok(below_root) => self.any_folder_matches(below_root),
            Err(_) => self.any_folder_matches(parent),
        }
    }
}
