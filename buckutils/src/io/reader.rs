//! PDF loading and validation.
//!
//! Every file that enters a catalog, and every source read again at combine
//! time, goes through [`PdfReader`]. The file handle lives only for the
//! duration of the read.

use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{BuckError, Result};

/// Bytes searched for the `%PDF-` marker. Some producers put junk before it.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,

    /// Time taken to load the document.
    pub load_time: Duration,
}

impl LoadedPdf {
    /// File name shown to users, falling back to the full path.
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Summary of a PDF without keeping the document around.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfSummary {
    /// Path that was inspected.
    pub path: PathBuf,
    /// File name shown to users.
    pub name: String,
    /// Number of pages.
    pub page_count: usize,
    /// PDF version string, e.g. `1.7`.
    pub version: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Size of the first page in points, if it declares one.
    pub page_dimensions: Option<(f32, f32)>,
}

/// Loads PDFs from disk, rejecting anything that is not a usable document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`BuckError::InvalidFile`] if:
    /// - The path does not exist or is a directory
    /// - The file cannot be read
    /// - The file does not start with a PDF header or does not parse
    /// - The PDF is encrypted
    /// - The PDF has no pages
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();

        check_path_is_file(path)?;

        let bytes = std::fs::read(path)
            .map_err(|err| BuckError::invalid_file(path, format!("cannot read file: {err}")))?;

        if !has_pdf_header(&bytes) {
            return Err(BuckError::invalid_file(path, "missing %PDF header"));
        }

        let document = Document::load_mem(&bytes).map_err(|err| {
            let msg = err.to_string();
            if msg.contains("encrypt") || msg.contains("password") {
                BuckError::invalid_file(path, "PDF is encrypted")
            } else {
                BuckError::invalid_file(path, msg)
            }
        })?;

        if document.is_encrypted() {
            return Err(BuckError::invalid_file(path, "PDF is encrypted"));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(BuckError::invalid_file(path, "PDF has no pages"));
        }

        tracing::debug!(path = %path.display(), page_count, "loaded pdf");

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size: bytes.len() as u64,
            load_time: start.elapsed(),
        })
    }

    /// Load a PDF and describe it.
    pub fn inspect(&self, path: &Path) -> Result<PdfSummary> {
        let loaded = self.load(path)?;
        let page_dimensions = first_page_dimensions(&loaded.document);

        Ok(PdfSummary {
            name: loaded.display_name(),
            page_count: loaded.page_count,
            version: loaded.document.version.clone(),
            file_size: loaded.file_size,
            page_dimensions,
            path: loaded.path,
        })
    }
}

/// File name of `path`, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn check_path_is_file(path: &Path) -> Result<()> {
    let exists = path
        .try_exists()
        .map_err(|err| BuckError::invalid_file(path, format!("cannot access file: {err}")))?;
    if !exists {
        return Err(BuckError::invalid_file(path, "file not found"));
    }
    if path.is_dir() {
        return Err(BuckError::invalid_file(path, "is a directory"));
    }
    Ok(())
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|candidate| candidate == b"%PDF-")
}

fn first_page_dimensions(doc: &Document) -> Option<(f32, f32)> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let page = doc.get_dictionary(page_id).ok()?;
    let mediabox = page.get(b"MediaBox").and_then(|o| o.as_array()).ok()?;
    if mediabox.len() < 4 {
        return None;
    }
    let width = mediabox[2].as_float().ok()?;
    let height = mediabox[3].as_float().ok()?;
    Some((width, height))
}
