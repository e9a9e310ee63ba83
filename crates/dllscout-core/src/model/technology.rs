/// Technology groups and the DLL filenames that identify them.
///
/// All filenames are stored lowercase; matching against on-disk names is
/// done on the lowercased entry name.
use serde::{Deserialize, Serialize};

/// A named acceleration technology detected through one or more DLLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    Dlss,
    DirectStorage,
    Xess,
}

impl Technology {
    pub const ALL: [Technology; 3] = [Self::Dlss, Self::DirectStorage, Self::Xess];

    /// Name used for the update preference of this technology.
    pub fn preference_name(self) -> &'static str {
        match self {
            Self::Dlss => "DLSS",
            Self::DirectStorage => "DirectStorage",
            Self::Xess => "XeSS",
        }
    }

    /// Candidate filenames for this group, in search order.
    pub fn dll_names(self) -> &'static [&'static str] {
        match self {
            Self::Dlss => &["nvngx_dlss.dll", "nvngx_dlssg.dll", "nvngx_dlssd.dll"],
            Self::DirectStorage => &["dstorage.dll", "dstoragecore.dll"],
            Self::Xess => &["libxess.dll"],
        }
    }
}

/// The active filename set for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DllFilter {
    names: Vec<String>,
}

impl DllFilter {
    /// Union of the filename lists of every enabled technology.
    pub fn from_technologies(enabled: impl IntoIterator<Item = Technology>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for tech in enabled {
            for name in tech.dll_names() {
                let lower = name.to_ascii_lowercase();
                if !names.contains(&lower) {
                    names.push(lower);
                }
            }
        }
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Case-insensitive test of a bare file name.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.names.iter().any(|n| *n == lower)
    }
}
