/// Steam library manifest (`libraryfolders.vdf`) parsing.
///
/// Only the `"path"` records matter: each one names a library folder whose
/// games live under `<path>/steamapps/common`. The rest of the VDF structure
/// is ignored, so both Steam's nested layout (`"path"  "D:\\Games"`) and the
/// flat single-line form (`"libraryfolders" "0" "path" "D:\\Games"`) work.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Split a line into its double-quoted tokens, resolving VDF escapes.
fn quoted_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut token = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => token.push(escaped),
                    None => token.push('\\'),
                },
                '"' => {
                    closed = true;
                    break;
                }
                other => token.push(other),
            }
        }
        if closed {
            tokens.push(token);
        }
    }
    tokens
}

/// Value following the `"path"` key on this line, if any. The key matches
/// case-insensitively.
fn path_value(line: &str) -> Option<String> {
    if !line.to_ascii_lowercase().contains("path") {
        return None;
    }
    let tokens = quoted_tokens(line);
    let key = tokens.iter().position(|t| t.eq_ignore_ascii_case("path"))?;
    tokens.into_iter().nth(key + 1).filter(|v| !v.is_empty())
}

/// Library roots listed in manifest text, in file order.
pub fn parse_library_folders(text: &str) -> Vec<PathBuf> {
    text.lines()
        .filter_map(path_value)
        .map(|value| PathBuf::from(value).join("steamapps").join("common"))
        .collect()
}

/// Read and parse a manifest file. Missing or unreadable files yield no roots.
pub fn read_library_manifest(path: &Path) -> Vec<PathBuf> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            debug!("Library manifest {} not readable: {err}", path.display());
            return Vec::new();
        }
    };

    let libraries = parse_library_folders(&text);
    debug!("Found {} Steam libraries in {}", libraries.len(), path.display());
    for lib in &libraries {
        debug!("Steam library path: {}", lib.display());
    }
    libraries
}
