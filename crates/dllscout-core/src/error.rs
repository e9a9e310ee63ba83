/// Error types for the core crate.
///
/// Almost every failure in a scan degrades to "fewer results" and is only
/// logged; these types cover the few that escape a component boundary.
use std::path::PathBuf;
use thiserror::Error;

/// Failure that aborts a whole scan. [`crate::scanner::Scanner::find_all_dlls`]
/// turns every variant into an empty result.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to build scan worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn scanner thread: {0}")]
    Spawn(std::io::Error),

    #[error("scan worker panicked: {0}")]
    Panicked(String),
}

/// Failure loading or persisting the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}
