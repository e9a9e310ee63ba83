//! DllScout — finds DLSS, DirectStorage and XeSS DLLs in installed games.
//!
//! Thin binary entry point. All logic lives in the `dllscout-core` crate;
//! this file only wires settings, logging and output together.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dllscout_core::config::{ConfigStore, JsonConfigStore};
use dllscout_core::platform::SystemLocator;
use dllscout_core::scanner::progress::ScanProgress;
use dllscout_core::whitelist::FolderWhitelist;
use dllscout_core::{start_scan, LauncherSource, ScanResult, Scanner};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "dllscout", version, about)]
struct Args {
    /// Settings file (created on first registry discovery if missing).
    #[arg(short, long, default_value = "dllscout.json")]
    config: PathBuf,

    /// Output format for the scan result.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Store a launcher folder before scanning, e.g. `--set custom1=D:\Mods`.
    /// Repeatable.
    #[arg(long = "set", value_name = "LAUNCHER=PATH", value_parser = parse_launcher_path)]
    set: Vec<(LauncherSource, String)>,

    /// Write the settings file (creating it with defaults if missing) and
    /// exit without scanning.
    #[arg(long)]
    write_config: bool,

    /// Log discovery details.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_launcher_path(arg: &str) -> Result<(LauncherSource, String), String> {
    let (key, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected LAUNCHER=PATH, got `{arg}`"))?;
    let source = LauncherSource::from_config_key(&key.trim().to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = LauncherSource::ALL.iter().map(|s| s.config_key()).collect();
        format!("unknown launcher `{key}` (expected one of: {})", known.join(", "))
    })?;
    Ok((source, path.trim().to_string()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for the result.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("DllScout starting");

    let store = JsonConfigStore::load(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    for (source, path) in &args.set {
        tracing::info!("Setting {source} folder to {path}");
        store.set_launcher_path(*source, path);
    }
    if args.write_config {
        store.save().context("failed to write settings")?;
        tracing::info!("Settings written to {}", store.path().display());
        return Ok(());
    }

    let whitelist = FolderWhitelist::new(store.settings().whitelist);

    let scanner = Scanner::new(Arc::new(store), Arc::new(SystemLocator), Arc::new(whitelist));
    let handle = start_scan(scanner).context("failed to start scan")?;

    for msg in handle.progress_rx.iter() {
        match msg {
            ScanProgress::SourceStarted { source, roots } => {
                tracing::debug!("Scanning {source}: {} root(s)", roots.len());
            }
            ScanProgress::SourceFinished { source, found } if found > 0 => {
                tracing::info!("{source}: {found} DLL(s)");
            }
            ScanProgress::Complete { duration, .. } => {
                tracing::info!("Scan completed in {duration:.2?}");
                break;
            }
            _ => {}
        }
    }
    let result = handle.wait();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result).context("failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &result).context("failed to write CSV")?,
    }
    Ok(())
}

/// One `launcher,path` row per DLL.
fn write_csv(out: impl Write, result: &ScanResult) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["launcher", "path"])?;
    for (source, paths) in result.iter() {
        for path in paths {
            let path = path.to_string_lossy();
            wtr.write_record([source.label(), path.as_ref()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
