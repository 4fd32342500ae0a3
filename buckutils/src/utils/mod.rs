//! Utilities for path collection and size formatting.

use crate::error::{BuckError, Result};
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths, in argument order.
///
/// A plain path without wildcards is passed through untouched even if it
/// does not exist, so the caller can report it as an unusable file.
///
/// # Errors
///
/// - [`BuckError::InvalidConfig`] for a malformed pattern, or a pattern with
///   wildcards that matches nothing
/// - [`BuckError::InvalidFile`] if a matched entry cannot be read
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./scans/2024-*.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !has_wildcards(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let paths = glob::glob(pattern)
        .map_err(|err| BuckError::invalid_config(format!("Invalid pattern '{pattern}': {err}")))?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            let path = err.path().to_path_buf();
            BuckError::invalid_file(path, err.error().to_string())
        })?;
        if path.is_file() {
            resolved_paths.push(path);
        }
    }

    if resolved_paths.is_empty() {
        return Err(BuckError::invalid_config(format!(
            "No files match pattern '{pattern}'"
        )));
    }

    Ok(resolved_paths)
}

fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
