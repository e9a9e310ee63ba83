/// Data model for DllScout.
///
/// Re-exports launcher identities, technology groups and scan result types.
pub mod launcher;
pub mod result;
pub mod technology;

pub use launcher::{DiscoveryStrategy, LauncherSource};
pub use result::{DiscoveredPath, ScanResult};
pub use technology::{DllFilter, Technology};
