/// Scan progress reporting — lightweight messages sent from the scan
/// threads to the caller via a crossbeam channel.

use crate::model::{LauncherSource, ScanResult};
use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::time::Duration;

/// Progress updates sent from the scan to the UI (or CLI).
#[derive(Debug)]
pub enum ScanProgress {
    /// No technology is selected; the scan finishes without touching disk.
    NothingSelected,
    /// Roots for a launcher have been resolved and walking begins.
    SourceStarted {
        source: LauncherSource,
        roots: Vec<PathBuf>,
    },
    /// A non-whitelisted DLL was found.
    Found {
        source: LauncherSource,
        path: PathBuf,
    },
    /// A DLL was found but the whitelist excluded it.
    Skipped {
        source: LauncherSource,
        path: PathBuf,
    },
    /// A non-fatal error (e.g. permission denied on one directory).
    Error { path: PathBuf, message: String },
    /// Walking finished for one launcher.
    SourceFinished { source: LauncherSource, found: usize },
    /// Scan completed. Always the last message.
    Complete {
        result: ScanResult,
        duration: Duration,
    },
}

/// Optional progress sink. Intermediate messages are dropped rather than
/// blocking the scan when the channel is full or disconnected.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<Sender<ScanProgress>>,
}

impl ProgressSink {
    pub fn new(tx: Sender<ScanProgress>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards everything.
    pub fn none() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, msg: ScanProgress) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(msg);
        }
    }

    /// Deliver the terminal message, waiting for channel space if needed.
    pub fn finish(&self, msg: ScanProgress) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg);
        }
    }
}
