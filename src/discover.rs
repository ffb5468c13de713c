//! Header discovery and decoding.
//!
//! Only the top level of the SDK directory is scanned. Headers are decoded as
//! Latin-1 so that stray non-UTF-8 bytes never abort a run.

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `.h` files directly inside `dir`, minus skipped files, sorted by name.
pub fn header_files(dir: &Path, config: &ParserConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ParseError::Io(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ParseError::Io(dir.to_path_buf(), e))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("h") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if config.is_skipped_file(name) {
            tracing::debug!(file = %name, "skipping file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Read a file, mapping each byte to the char with the same code point.
pub fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ParseError::Io(path.to_path_buf(), e))?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}
