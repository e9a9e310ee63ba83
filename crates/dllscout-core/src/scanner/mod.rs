/// Scanner module — orchestrates the search across every launcher.
///
/// A scan runs in three stages:
/// - **Select:** the enabled technologies give the filename set; if it is
///   empty the scan returns immediately without touching the disk.
/// - **Fan out:** each [`LauncherSource`] gets its own task on a private
///   rayon pool which resolves the source's roots and walks them.
/// - **Merge:** once every task has finished, results are merged in
///   [`LauncherSource::ALL`] order and any path already reported by an
///   earlier source (or earlier in the same source) is dropped.
///
/// Tasks only ever append to their own `Vec`, and the merge runs after the
/// parallel `collect`, so the final result is deterministic no matter which
/// task finishes first.
pub mod progress;
pub mod walker;

use crate::config::ConfigStore;
use crate::error::ScanError;
use crate::model::{DiscoveredPath, DllFilter, LauncherSource, ScanResult, Technology};
use crate::platform::InstallLocator;
use crate::resolver::PathResolver;
use crate::whitelist::WhitelistGate;
use crossbeam_channel::Receiver;
use progress::{ProgressSink, ScanProgress};
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

/// Maximum number of progress messages that may queue up in the channel.
///
/// Intermediate messages beyond this are dropped rather than stalling the
/// scan; only the final `Complete` waits for room.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Everything a scan needs, injected by the caller.
#[derive(Clone)]
pub struct Scanner {
    config: Arc<dyn ConfigStore>,
    locator: Arc<dyn InstallLocator>,
    gate: Arc<dyn WhitelistGate>,
    progress: ProgressSink,
}

impl Scanner {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        locator: Arc<dyn InstallLocator>,
        gate: Arc<dyn WhitelistGate>,
    ) -> Self {
        Self {
            config,
            locator,
            gate,
            progress: ProgressSink::none(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Filenames to search for, read once from the preferences.
    pub fn dll_filter(&self) -> DllFilter {
        DllFilter::from_technologies(
            Technology::ALL
                .into_iter()
                .filter(|t| self.config.update_preference(*t)),
        )
    }

    /// Run a full scan.
    ///
    /// Per-source failures are already absorbed by the resolver and walker;
    /// an `Err` here means the scan machinery itself could not run.
    pub fn scan_all(&self) -> Result<ScanResult, ScanError> {
        let filter = self.dll_filter();
        if filter.is_empty() {
            info!("No technologies selected for update, skipping scan");
            self.progress.send(ScanProgress::NothingSelected);
            return Ok(ScanResult::empty());
        }
        debug!("Searching for: {}", filter.names().join(", "));

        let threads = num_cpus::get().clamp(1, LauncherSource::ALL.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("dllscout-source-{i}"))
            .build()?;

        let per_source: Vec<Vec<DiscoveredPath>> = pool.install(|| {
            LauncherSource::ALL
                .par_iter()
                .map(|&source| self.scan_source(source, &filter))
                .collect()
        });

        let result = merge(per_source);
        info!("Scan finished: {} DLLs found", result.total());
        Ok(result)
    }

    /// Like [`Scanner::scan_all`], but never fails: any error or panic is
    /// logged and replaced by the all-empty result.
    pub fn find_all_dlls(&self) -> ScanResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.scan_all())) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                error!("Error in find_all_dlls: {err}");
                ScanResult::empty()
            }
            Err(payload) => {
                let err = ScanError::Panicked(panic_message(payload.as_ref()));
                error!("Error in find_all_dlls: {err}");
                ScanResult::empty()
            }
        }
    }

    fn scan_source(&self, source: LauncherSource, filter: &DllFilter) -> Vec<DiscoveredPath> {
        let resolver = PathResolver::new(self.config.as_ref(), self.locator.as_ref());
        let roots = resolver.resolve(source);
        if roots.is_empty() {
            debug!("{source}: nothing to scan");
            self.progress.send(ScanProgress::SourceFinished { source, found: 0 });
            return Vec::new();
        }

        self.progress.send(ScanProgress::SourceStarted {
            source,
            roots: roots.clone(),
        });
        let found = walker::find_dlls(
            &roots,
            source,
            filter,
            self.gate.as_ref(),
            &self.progress,
        );
        self.progress.send(ScanProgress::SourceFinished {
            source,
            found: found.len(),
        });
        found
    }
}

/// Merge per-source lists (given in [`LauncherSource::ALL`] order), keeping
/// the first occurrence of every normalized path.
pub fn merge(per_source: Vec<Vec<DiscoveredPath>>) -> ScanResult {
    let mut result = ScanResult::empty();
    let mut seen: HashMap<PathBuf, LauncherSource> = HashMap::new();

    for found in per_source {
        for dll in found {
            let key = normalize_path(&dll.path);
            if let Some(owner) = seen.get(&key) {
                debug!(
                    "Dropping duplicate {} from {}: already reported under {owner}",
                    dll.path.display(),
                    dll.source
                );
                continue;
            }
            seen.insert(key, dll.source);
            result.push(dll.source, dll.path);
        }
    }
    result
}

/// Key used for duplicate detection.
///
/// Resolves symlinks and `..` when the file still exists, otherwise cleans
/// the path lexically. Windows paths compare case-insensitively.
pub fn normalize_path(path: &Path) -> PathBuf {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    });
    if cfg!(windows) {
        PathBuf::from(resolved.to_string_lossy().to_lowercase())
    } else {
        resolved
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Receiver for progress updates; the last message is `Complete`.
    pub progress_rx: Receiver<ScanProgress>,
    thread: thread::JoinHandle<ScanResult>,
}

impl ScanHandle {
    /// Block until the scan finishes and return its result.
    ///
    /// Drops the progress receiver first so the scan thread can never block
    /// on a full channel nobody is reading.
    pub fn wait(self) -> ScanResult {
        let ScanHandle {
            progress_rx,
            thread,
        } = self;
        drop(progress_rx);
        thread.join().unwrap_or_else(|payload| {
            error!("Scanner thread panicked: {}", panic_message(payload.as_ref()));
            ScanResult::empty()
        })
    }
}

/// Start a scan on a background thread.
///
/// Returns immediately; progress and the final result arrive through
/// `handle.progress_rx`, or via [`ScanHandle::wait`].
pub fn start_scan(scanner: Scanner) -> Result<ScanHandle, ScanError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let sink = ProgressSink::new(progress_tx);
    let scanner = scanner.with_progress(sink.clone());

    let thread = thread::Builder::new()
        .name("dllscout-scanner".into())
        .spawn(move || {
            info!("Starting DLL scan");
            let start = Instant::now();
            let result = scanner.find_all_dlls();
            let duration = start.elapsed();
            debug!("Scan complete in {duration:?}");
            sink.finish(ScanProgress::Complete {
                result: result.clone(),
                duration,
            });
            result
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        thread,
    })
}
