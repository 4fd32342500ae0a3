//! Page thumbnails through an external Ghostscript process.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{BuckError, Result};

/// Executable names tried on `PATH`, most specific first.
const EXECUTABLE_NAMES: &[&str] = &["gswin64c", "gswin32c", "gs"];

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A Ghostscript executable that renders single pages to PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghostscript {
    executable: PathBuf,
}

impl Ghostscript {
    /// Use a specific executable without checking it.
    pub fn from_path(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Find Ghostscript on this machine.
    ///
    /// Looks on `PATH` first, then under `Program Files\gs\*\bin` on Windows.
    pub fn locate() -> Option<Self> {
        let found = find_on_path().or_else(find_in_program_files);
        match &found {
            Some(executable) => {
                tracing::debug!(executable = %executable.display(), "found ghostscript")
            }
            None => tracing::debug!("ghostscript not found, previews will be text only"),
        }
        found.map(Self::from_path)
    }

    /// Path of the executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Render one page (zero-based) of `pdf` into `out_dir`.
    ///
    /// Returns the path of the written PNG.
    pub fn render_page(
        &self,
        pdf: &Path,
        page_index: usize,
        out_dir: &Path,
        resolution: u32,
    ) -> Result<PathBuf> {
        let output_path = out_dir.join(thumbnail_name(pdf, page_index));
        let page_number = page_index + 1;

        let mut command = Command::new(&self.executable);
        command
            .arg("-dBATCH")
            .arg("-dNOPAUSE")
            .arg("-sDEVICE=png16m")
            .arg("-dSAFER")
            .arg(format!("-dFirstPage={page_number}"))
            .arg(format!("-dLastPage={page_number}"))
            .arg(format!("-r{resolution}"))
            .arg(format!("-sOutputFile={}", output_path.display()))
            .arg(pdf);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let output = command.output().map_err(|e| {
            BuckError::other(format!(
                "failed to run {}: {e}",
                self.executable.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuckError::other(format!(
                "ghostscript exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if !output_path.exists() {
            return Err(BuckError::other("ghostscript produced no image"));
        }

        Ok(output_path)
    }
}

/// File name of the thumbnail for one page, e.g.
/// `buckutils_preview_report_3f2a9c01d4e5b678_0.png`.
///
/// The hash of the full source path keeps same-named files from different
/// directories apart.
pub fn thumbnail_name(pdf: &Path, page_index: usize) -> String {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    pdf.hash(&mut hasher);
    format!("buckutils_preview_{stem}_{:016x}_{page_index}.png", hasher.finish())
}

fn find_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();

    EXECUTABLE_NAMES.iter().find_map(|name| {
        dirs.iter()
            .map(|dir| dir.join(executable_file_name(name)))
            .find(|candidate| candidate.is_file())
    })
}

fn executable_file_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

fn find_in_program_files() -> Option<PathBuf> {
    if !cfg!(windows) {
        return None;
    }

    let roots = [
        std::env::var("PROGRAMFILES").unwrap_or_else(|_| r"C:\Program Files".to_string()),
        std::env::var("PROGRAMFILES(X86)").unwrap_or_else(|_| r"C:\Program Files (x86)".to_string()),
    ];

    for root in roots {
        for exe in ["gswin64c.exe", "gswin32c.exe"] {
            let pattern = Path::new(&root).join("gs").join("*").join("bin").join(exe);
            let Ok(matches) = glob::glob(&pattern.to_string_lossy()) else {
                continue;
            };
            if let Some(found) = matches.filter_map(|entry| entry.ok()).find(|p| p.is_file()) {
                return Some(found);
            }
        }
    }

    None
}
