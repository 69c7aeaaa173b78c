//! Command handlers

pub mod format;
pub mod merge;

use crate::error::{CliError, CliResult};
use hitcov::{load_collector_file, HitMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Expand inputs into a sorted list of coverage JSON files
///
/// Files are taken as given; directories are searched recursively for
/// `*.json`.
pub fn collect_input_files(inputs: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let dir = glob::Pattern::escape(&input.to_string_lossy());
            let pattern = format!("{}/**/*.json", dir.trim_end_matches('/'));
            let entries = glob::glob(&pattern)
                .map_err(|e| CliError::invalid_argument(format!("{}: {e}", input.display())))?;
            for entry in entries {
                let path = entry.map_err(|e| CliError::Io(e.into_error()))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();

    if files.is_empty() {
        let inputs = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::NoInputs { inputs });
    }
    Ok(files)
}

/// Load and merge every coverage file named by `inputs`
pub fn load_hitmap(inputs: &[PathBuf]) -> CliResult<HitMap> {
    let files = collect_input_files(inputs)?;
    let mut hitmap = HitMap::new();
    for file in &files {
        debug!(path = %file.display(), "loading coverage");
        let samples = load_collector_file(file)?;
        hitmap.merge_from(&HitMap::from_samples(&samples)?);
    }
    info!(files = files.len(), scripts = hitmap.len(), "merged coverage inputs");
    Ok(hitmap)
}

/// Write text to a file, or stdout when no path is given
pub fn write_output(out: Option<&Path>, text: &str) -> CliResult<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
