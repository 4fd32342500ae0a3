//! Resolving input paths from arguments and input-list files.

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use buckutils::error::{BuckError, Result};
use buckutils::utils::collect_paths_for_patterns;

/// Expand `patterns` and append the paths listed in `input_list`.
///
/// Paths from the list are appended after the command line inputs and are
/// not glob-expanded.
pub async fn resolve_inputs(patterns: &[String], input_list: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut inputs = collect_paths_for_patterns(patterns)?;

    if let Some(list) = input_list {
        inputs.extend(read_input_list(list).await?);
    }

    if inputs.is_empty() {
        return Err(BuckError::invalid_config("No input files specified"));
    }

    Ok(inputs)
}

/// Read one path per line. Empty lines and lines starting with `#` are
/// skipped.
pub async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(path)
        .await
        .map_err(|e| BuckError::read_error(path, format!("cannot open input list: {e}")))?;

    let mut lines = BufReader::new(file).lines();
    let mut paths = Vec::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BuckError::read_error(path, format!("cannot read input list: {e}")))?
    {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        paths.push(PathBuf::from(line));
    }

    tracing::debug!(list = %path.display(), count = paths.len(), "read input list");
    Ok(paths)
}
