/// DllScout Core — launcher discovery, DLL scanning, and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`] — Launcher sources, technology groups and scan results.
/// - [`config`] — Injected settings store (install paths, preferences).
/// - [`platform`] — Registry-based launcher install lookup.
/// - [`resolver`] — Per-launcher root discovery and Steam manifest parsing.
/// - [`whitelist`] — Exclusion gate for discovered DLLs.
/// - [`scanner`] — Fan-out scan, directory walker, and progress reporting.
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod resolver;
pub mod scanner;
pub mod whitelist;

pub use error::{ConfigError, ScanError};
pub use model::{DiscoveredPath, LauncherSource, ScanResult, Technology};
pub use scanner::{start_scan, ScanHandle, Scanner};
