/// End-to-end scanner integration tests.
///
/// These tests drive `Scanner` against real temporary directories laid out
/// like launcher libraries, with hand-written collaborators standing in for
/// the registry and the whitelist so each test controls exactly what the
/// scan can discover.
use dllscout_core::config::{ConfigStore, MemoryConfig, Preferences, Settings};
use dllscout_core::platform::{InstallLocator, NoLocator, RegistryKey};
use dllscout_core::scanner::progress::ScanProgress;
use dllscout_core::whitelist::{FolderWhitelist, NoWhitelist, WhitelistGate};
use dllscout_core::{start_scan, LauncherSource, ScanResult, Scanner, Technology};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"MZ").unwrap();
}

/// Write a `libraryfolders.vdf` for a Steam install listing `libraries`.
fn write_manifest(install: &Path, libraries: &[&Path]) {
    let mut text = String::from("\"libraryfolders\"\n{\n");
    for (i, lib) in libraries.iter().enumerate() {
        let escaped = lib.to_string_lossy().replace('\\', "\\\\");
        text.push_str(&format!("\t\"{i}\"\n\t{{\n\t\t\"path\"\t\t\"{escaped}\"\n\t}}\n"));
    }
    text.push_str("}\n");
    let steamapps = install.join("steamapps");
    fs::create_dir_all(&steamapps).unwrap();
    fs::write(steamapps.join("libraryfolders.vdf"), text).unwrap();
}

fn common(library: &Path) -> PathBuf {
    library.join("steamapps").join("common")
}

/// Config store that counts lookups, to prove a scan did no discovery work.
struct CountingConfig {
    inner: MemoryConfig,
    lookups: AtomicUsize,
}

impl CountingConfig {
    fn new(settings: Settings) -> Self {
        Self {
            inner: MemoryConfig::new(settings),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl ConfigStore for CountingConfig {
    fn launcher_path(&self, source: LauncherSource) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.launcher_path(source)
    }

    fn set_launcher_path(&self, source: LauncherSource, value: &str) {
        self.inner.set_launcher_path(source, value);
    }

    fn update_preference(&self, technology: Technology) -> bool {
        self.inner.update_preference(technology)
    }
}

/// Gate that counts calls and optionally panics.
#[derive(Default)]
struct CountingGate {
    calls: AtomicUsize,
    panic: bool,
}

impl WhitelistGate for CountingGate {
    fn is_excluded(&self, _path: &Path) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("whitelist backend exploded");
        }
        false
    }
}

struct SteamAt(PathBuf);

impl InstallLocator for SteamAt {
    fn install_path(&self, key: RegistryKey) -> Option<PathBuf> {
        match key {
            RegistryKey::Steam => Some(self.0.clone()),
            RegistryKey::Ubisoft => None,
        }
    }
}

fn scanner(settings: Settings) -> Scanner {
    Scanner::new(
        Arc::new(MemoryConfig::new(settings)),
        Arc::new(NoLocator),
        Arc::new(NoWhitelist),
    )
}

fn assert_all_empty(result: &ScanResult) {
    assert_eq!(result.iter().count(), LauncherSource::ALL.len());
    for (source, paths) in result.iter() {
        assert!(paths.is_empty(), "{source} should be empty, got {paths:?}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// With every technology switched off the scan must not look anything up.
#[test]
fn empty_selection_does_no_io() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("game").join("nvngx_dlss.dll"));

    let config = Arc::new(CountingConfig::new(
        Settings::default()
            .with_preferences(Preferences::none())
            .with_launcher_path(LauncherSource::Custom1, tmp.path().to_string_lossy()),
    ));
    let gate = Arc::new(CountingGate::default());
    let scanner = Scanner::new(config.clone(), Arc::new(NoLocator), gate.clone());

    let result = scanner.find_all_dlls();
    assert_all_empty(&result);
    assert_eq!(config.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(gate.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn filename_match_is_case_insensitive() {
    let tmp = TempDir::new().unwrap();
    let dll = tmp.path().join("Game").join("NVNGX_DLSS.dll");
    touch(&dll);

    let result = scanner(
        Settings::default().with_launcher_path(LauncherSource::Custom3, tmp.path().to_string_lossy()),
    )
    .find_all_dlls();
    assert_eq!(result.paths(LauncherSource::Custom3), &[dll]);
    assert_eq!(result.total(), 1);
}

/// The Steam install is itself library "0" and is listed twice; a custom
/// folder also points at its `steamapps/common`. Each DLL must be reported
/// exactly once, under Steam.
#[test]
fn duplicate_roots_are_reported_once() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    write_manifest(&install, &[&install, &install]);
    let dll = common(&install).join("Portal RTX").join("nvngx_dlss.dll");
    touch(&dll);

    let result = scanner(
        Settings::default()
            .with_launcher_path(LauncherSource::Steam, install.to_string_lossy())
            .with_launcher_path(LauncherSource::Custom1, common(&install).to_string_lossy()),
    )
    .find_all_dlls();

    assert_eq!(result.paths(LauncherSource::Steam), &[dll]);
    assert!(result.paths(LauncherSource::Custom1).is_empty());
    assert_eq!(result.total(), 1);
}

/// Two manifest libraries are both scanned, in manifest order.
#[test]
fn steam_manifest_libraries_are_scanned() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    let lib_d = tmp.path().join("D");
    let lib_e = tmp.path().join("E");
    write_manifest(&install, &[&lib_d, &lib_e]);
    let dll_d = common(&lib_d).join("GameD").join("dstorage.dll");
    let dll_e = common(&lib_e).join("GameE").join("libxess.dll");
    touch(&dll_d);
    touch(&dll_e);

    let result = scanner(
        Settings::default().with_launcher_path(LauncherSource::Steam, install.to_string_lossy()),
    )
    .find_all_dlls();
    assert_eq!(result.paths(LauncherSource::Steam), &[dll_d, dll_e]);
}

/// A library that cannot be walked must not hide DLLs in the next library
/// or in other launchers.
#[test]
fn broken_library_does_not_stop_scan() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    let missing = tmp.path().join("UnpluggedDrive");
    let good = tmp.path().join("Library2");
    write_manifest(&install, &[&missing, &good]);
    let steam_dll = common(&good).join("Game").join("nvngx_dlssg.dll");
    touch(&steam_dll);

    let epic = tmp.path().join("Epic");
    let epic_dll = epic.join("Fortnite").join("nvngx_dlss.dll");
    touch(&epic_dll);

    let result = scanner(
        Settings::default()
            .with_launcher_path(LauncherSource::Steam, install.to_string_lossy())
            .with_launcher_path(LauncherSource::Epic, epic.to_string_lossy()),
    )
    .find_all_dlls();
    assert_eq!(result.paths(LauncherSource::Steam), &[steam_dll]);
    assert_eq!(result.paths(LauncherSource::Epic), &[epic_dll]);
}

/// A permission-denied folder inside the first library is skipped; its
/// siblings and the second library are still scanned, and the failure is
/// reported on the progress channel.
#[cfg(unix)]
#[test]
fn locked_folder_does_not_stop_scan() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    let lib_d = tmp.path().join("D");
    let lib_e = tmp.path().join("E");
    write_manifest(&install, &[&lib_d, &lib_e]);
    let locked = common(&lib_d).join("AntiCheatGame");
    touch(&locked.join("nvngx_dlss.dll"));
    let dll_d = common(&lib_d).join("OpenGame").join("nvngx_dlss.dll");
    let dll_e = common(&lib_e).join("OtherGame").join("libxess.dll");
    touch(&dll_d);
    touch(&dll_e);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Mode bits do not bind a privileged user.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let handle = start_scan(scanner(
        Settings::default().with_launcher_path(LauncherSource::Steam, install.to_string_lossy()),
    ))
    .unwrap();

    let mut errors = Vec::new();
    let mut result = None;
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    while result.is_none() && std::time::Instant::now() < deadline {
        match handle.progress_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(ScanProgress::Error { path, .. }) => errors.push(path),
            Ok(ScanProgress::Complete { result: r, .. }) => result = Some(r),
            _ => {}
        }
    }
    handle.wait();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let result = result.expect("scan did not complete in time");
    assert_eq!(result.paths(LauncherSource::Steam), &[dll_d, dll_e]);
    assert_eq!(errors, vec![locked]);
}

/// A whitelist entry that happens to name a folder above the library root
/// does not hide the library.
#[test]
fn whitelist_entry_above_library_is_ignored() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    let library = tmp.path().join("Games").join("SteamLibrary");
    write_manifest(&install, &[&library]);
    let dll = common(&library).join("Portal").join("nvngx_dlss.dll");
    touch(&dll);

    let scanner = Scanner::new(
        Arc::new(MemoryConfig::new(
            Settings::default().with_launcher_path(LauncherSource::Steam, install.to_string_lossy()),
        )),
        Arc::new(NoLocator),
        Arc::new(FolderWhitelist::new(["Games"])),
    );
    let result = scanner.find_all_dlls();
    assert_eq!(result.paths(LauncherSource::Steam), &[dll]);
}

#[test]
fn whitelisted_paths_never_appear() {
    let tmp = TempDir::new().unwrap();
    let kept = tmp.path().join("Kept Game").join("nvngx_dlss.dll");
    touch(&kept);
    touch(&tmp.path().join("Patched Game").join("nvngx_dlss.dll"));

    let scanner = Scanner::new(
        Arc::new(MemoryConfig::new(
            Settings::default().with_launcher_path(LauncherSource::Gog, tmp.path().to_string_lossy()),
        )),
        Arc::new(NoLocator),
        Arc::new(FolderWhitelist::new(["patched game"])),
    );
    let result = scanner.find_all_dlls();
    assert_eq!(result.paths(LauncherSource::Gog), &[kept]);
    assert_eq!(result.total(), 1);
}

/// A configured custom folder that does not exist contributes nothing and
/// is never walked.
#[test]
fn missing_custom_folder_is_empty() {
    let tmp = TempDir::new().unwrap();
    let gate = Arc::new(CountingGate::default());
    let scanner = Scanner::new(
        Arc::new(MemoryConfig::new(Settings::default().with_launcher_path(
            LauncherSource::Custom4,
            tmp.path().join("nope").to_string_lossy(),
        ))),
        Arc::new(NoLocator),
        gate.clone(),
    );

    let result = scanner.find_all_dlls();
    assert_all_empty(&result);
    assert_eq!(gate.calls.load(Ordering::SeqCst), 0);
}

/// A Steam install found through the locator is used and remembered.
#[test]
fn registry_discovery_is_written_back() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("Steam");
    let dll = common(&install).join("Game").join("nvngx_dlssd.dll");
    touch(&dll);

    let config = Arc::new(MemoryConfig::default());
    let scanner = Scanner::new(
        config.clone(),
        Arc::new(SteamAt(install.clone())),
        Arc::new(NoWhitelist),
    );
    let result = scanner.find_all_dlls();

    assert_eq!(result.paths(LauncherSource::Steam), &[dll]);
    assert_eq!(
        config.launcher_path(LauncherSource::Steam),
        Some(install.to_string_lossy().into_owned())
    );
}

/// A panicking collaborator is absorbed: the caller still gets every key.
#[test]
fn catastrophic_failure_returns_empty_mapping() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("Game").join("nvngx_dlss.dll"));

    let scanner = Scanner::new(
        Arc::new(MemoryConfig::new(
            Settings::default().with_launcher_path(LauncherSource::Xbox, tmp.path().to_string_lossy()),
        )),
        Arc::new(NoLocator),
        Arc::new(CountingGate {
            calls: AtomicUsize::new(0),
            panic: true,
        }),
    );
    assert_all_empty(&scanner.find_all_dlls());
}

/// The background scan reports progress and ends with `Complete`.
#[test]
fn background_scan_sends_complete() {
    let tmp = TempDir::new().unwrap();
    let dll = tmp.path().join("Game").join("dstorage.dll");
    touch(&dll);

    let handle = start_scan(scanner(
        Settings::default().with_launcher_path(LauncherSource::Ea, tmp.path().to_string_lossy()),
    ))
    .expect("failed to start scan");

    let mut saw_found = false;
    let result = loop {
        match handle.progress_rx.recv_timeout(Duration::from_secs(30)) {
            Ok(ScanProgress::Found { source, path }) => {
                assert_eq!(source, LauncherSource::Ea);
                assert_eq!(path, dll);
                saw_found = true;
            }
            Ok(ScanProgress::Complete { result, .. }) => break result,
            Ok(_) => continue,
            Err(err) => panic!("scanner did not complete: {err}"),
        }
    };

    assert!(saw_found, "expected a Found message before Complete");
    assert_eq!(result.paths(LauncherSource::Ea), &[dll]);
    assert_eq!(handle.wait(), result);
}

/// `wait` must return even when nobody reads the progress channel.
#[test]
fn wait_without_draining_progress() {
    let tmp = TempDir::new().unwrap();
    for i in 0..20 {
        touch(&tmp.path().join(format!("Game{i}")).join("nvngx_dlss.dll"));
    }

    let handle = start_scan(scanner(
        Settings::default().with_launcher_path(LauncherSource::BattleNet, tmp.path().to_string_lossy()),
    ))
    .expect("failed to start scan");
    let result = handle.wait();
    assert_eq!(result.paths(LauncherSource::BattleNet).len(), 20);
}

const _: () = assert!(
    dllscout_core::scanner::PROGRESS_CHANNEL_CAPACITY > 0,
    "PROGRESS_CHANNEL_CAPACITY must be > 0"
);
