/// Directory walker — finds candidate DLLs under a launcher's roots.
///
/// Roots are walked one after another with a serial `jwalk` iterator; the
/// per-source fan-out in [`super::Scanner`] already spreads work across
/// threads, so nesting another parallel walk per root would only add
/// contention.
///
/// # Failure policy
///
/// A root that does not exist, or a directory that cannot be read, is logged
/// and skipped. Nothing in here aborts the scan: the worst case for a broken
/// library is zero results from that library.
use crate::model::{DiscoveredPath, DllFilter, LauncherSource};
use crate::scanner::progress::{ProgressSink, ScanProgress};
use crate::whitelist::WhitelistGate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Walk every root in order and collect matching, non-whitelisted DLLs.
pub fn find_dlls(
    roots: &[PathBuf],
    source: LauncherSource,
    filter: &DllFilter,
    gate: &dyn WhitelistGate,
    progress: &ProgressSink,
) -> Vec<DiscoveredPath> {
    debug!("Searching for DLLs in {source}");
    let mut found = Vec::new();

    for root in roots {
        debug!("Scanning directory: {}", root.display());
        walk_root(root, source, filter, gate, progress, &mut found);
    }

    debug!("Found {} DLLs in {source}", found.len());
    found
}

fn walk_root(
    root: &Path,
    source: LauncherSource,
    filter: &DllFilter,
    gate: &dyn WhitelistGate,
    progress: &ProgressSink,
    found: &mut Vec<DiscoveredPath>,
) {
    if !root.is_dir() {
        warn!("Error scanning {}: not a readable directory", root.display());
        progress.send(ScanProgress::Error {
            path: root.to_path_buf(),
            message: "library folder not found".into(),
        });
        return;
    }

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial)
        // Called once per directory read: give other scan threads and the
        // UI a turn before the next directory.
        .process_read_dir(|_depth, _path, _state, _children| std::thread::yield_now());

    for entry_result in walker {
        let mut entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                report_walk_error(&err, root, progress);
                continue;
            }
        };

        // An unreadable directory still comes back as an entry; jwalk parks
        // the read error on it and carries on with its siblings.
        if let Some(err) = entry.read_children_error.take() {
            report_walk_error(&err, root, progress);
        }

        if entry.depth == 0 || entry.file_type().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !filter.matches(&file_name) {
            continue;
        }

        let path = entry.path();
        debug!("Found DLL: {}", path.display());
        if gate.is_excluded_under(root, &path) {
            info!("Skipped whitelisted game in {source}: {}", path.display());
            progress.send(ScanProgress::Skipped { source, path });
        } else {
            info!("Found non-whitelisted DLL in {source}: {}", path.display());
            progress.send(ScanProgress::Found {
                source,
                path: path.clone(),
            });
            found.push(DiscoveredPath::new(path, source));
        }
    }
}

fn report_walk_error(err: &jwalk::Error, root: &Path, progress: &ProgressSink) {
    // Typically access-denied on a directory.
    let err_path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    warn!("Error scanning {}: {err}", err_path.display());
    progress.send(ScanProgress::Error {
        path: err_path,
        message: err.to_string(),
    });
}
