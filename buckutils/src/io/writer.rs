//! Writing combined PDFs to disk.
//!
//! Output is written to a sibling temp file and renamed into place, so a
//! failed combine never leaves a half-written PDF at the destination.
//!
//! # Examples
//!
//! ```no_run
//! use buckutils::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(doc, Path::new("combined.pdf"))?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{BuckError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write to a temp file, then rename.
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Renumber objects so the xref table is dense.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that leaves streams as they are.
    pub fn without_compression() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                ..Default::default()
            },
        }
    }

    /// The options this writer uses.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns [`BuckError::WriteError`] if the destination directory does not
    /// exist, is not writable, or the disk fills up.
    pub fn save(&self, doc: Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use buckutils::io::writer::PdfWriter;
    /// # use lopdf::Document;
    /// # use std::path::Path;
    /// # fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let stats = PdfWriter::new().save_with_stats(doc, Path::new("combined.pdf"))?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub fn save_with_stats(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let options = &self.options;
        let start = Instant::now();

        if options.compress {
            doc.compress();
        }
        if options.optimize {
            doc.renumber_objects();
        }

        let write_path = if options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = write_to(&mut doc, &write_path, options.buffer_size) {
            if options.atomic {
                let _ = std::fs::remove_file(&write_path);
            }
            return Err(BuckError::write_error(path, err));
        }

        if options.atomic
            && let Err(err) = std::fs::rename(&write_path, path)
        {
            let _ = std::fs::remove_file(&write_path);
            return Err(BuckError::write_error(path, err));
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        tracing::debug!(path = %path.display(), file_size, "wrote pdf");

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compressed: options.compress,
        })
    }
}

fn write_to(doc: &mut Document, path: &Path, buffer_size: usize) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);
    doc.save_to(&mut writer).map_err(std::io::Error::other)?;
    writer.flush()
}

/// Sibling temp file, e.g. `out.pdf` -> `.out.pdf.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_test_document;
    use tempfile::TempDir;

    #[test]
    fn test_save_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("output.pdf");

        let writer = PdfWriter::new();
        writer
            .save(build_test_document(1, 2), &output_path)
            .unwrap();

        assert!(output_path.exists());
        let reloaded = Document::load(&output_path).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn test_save_with_stats() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("output.pdf");

        let stats = PdfWriter::new()
            .save_with_stats(build_test_document(1, 1), &output_path)
            .unwrap();

        assert!(stats.file_size > 0);
        assert_eq!(stats.output_path, output_path);
        assert!(stats.compressed);
        assert!(!temp_path_for(&output_path).exists());
    }

    #[test]
    fn test_without_compression() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("output.pdf");

        let stats = PdfWriter::without_compression()
            .save_with_stats(build_test_document(1, 1), &output_path)
            .unwrap();
        assert!(!stats.compressed);
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("missing").join("output.pdf");

        let err = PdfWriter::new()
            .save(build_test_document(1, 1), &output_path)
            .unwrap_err();

        assert!(matches!(err, BuckError::WriteError { ref path, .. } if path == &output_path));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let temp = temp_path_for(Path::new("/data/combined.pdf"));
        assert_eq!(temp, PathBuf::from("/data/.combined.pdf.tmp"));
    }
}
