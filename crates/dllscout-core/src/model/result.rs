/// Scan output types.
///
/// `ScanResult` always carries an entry for every [`LauncherSource`], so a
/// consumer never has to handle a missing key.
use super::LauncherSource;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A DLL found on disk together with the launcher it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPath {
    pub path: PathBuf,
    pub source: LauncherSource,
}

impl DiscoveredPath {
    pub fn new(path: PathBuf, source: LauncherSource) -> Self {
        Self { path, source }
    }
}

/// Final mapping of launcher → discovered DLL paths.
///
/// Keys iterate in [`LauncherSource::ALL`] order (the enum's `Ord` follows
/// declaration order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    entries: BTreeMap<LauncherSource, Vec<PathBuf>>,
}

impl ScanResult {
    /// Every source bound to an empty list.
    pub fn empty() -> Self {
        Self {
            entries: LauncherSource::ALL
                .into_iter()
                .map(|s| (s, Vec::new()))
                .collect(),
        }
    }

    pub fn paths(&self, source: LauncherSource) -> &[PathBuf] {
        self.entries.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn push(&mut self, source: LauncherSource, path: PathBuf) {
        self.entries.entry(source).or_default().push(path);
    }

    pub fn iter(&self) -> impl Iterator<Item = (LauncherSource, &[PathBuf])> {
        self.entries.iter().map(|(s, v)| (*s, v.as_slice()))
    }

    /// Total number of DLLs across all sources.
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, paths) in &self.entries {
            map.serialize_entry(source.label(), paths)?;
        }
        map.end()
    }
}
