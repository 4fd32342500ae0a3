//! Combining catalog entries into a single PDF.

use lopdf::Document;
use std::path::Path;
use std::time::{Duration, Instant};

use super::assembler::PageAssembler;
use crate::catalog::{CatalogEntry, PageSpan};
use crate::config::CompressionLevel;
use crate::error::{BuckError, Result};
use crate::io::{PdfReader, PdfWriter, WriteOptions};
use crate::utils::format_file_size;

/// Statistics about a combine operation.
#[derive(Debug, Clone)]
pub struct CombineStatistics {
    /// Distinct source files read.
    pub sources_read: usize,

    /// Pages in the output.
    pub total_pages: usize,

    /// Combined size of the source files.
    pub input_size: u64,

    /// Size of the written file, `None` when nothing was written.
    pub output_size: Option<u64>,

    /// Total time taken.
    pub elapsed: Duration,
}

impl CombineStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> Option<String> {
        self.output_size.map(format_file_size)
    }
}

/// A combined document that has not been written yet.
pub struct CombineResult {
    /// The combined document.
    pub document: Document,

    /// Statistics about the build.
    pub statistics: CombineStatistics,
}

/// Produces one output document from an ordered list of entries.
#[derive(Debug, Clone)]
pub struct Combiner {
    reader: PdfReader,
    writer: PdfWriter,
    compression: CompressionLevel,
}

impl Combiner {
    /// Create a combiner with standard compression.
    pub fn new() -> Self {
        Self::with_compression(CompressionLevel::default())
    }

    /// Create a combiner with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        let writer = PdfWriter::with_options(WriteOptions {
            compress: compression != CompressionLevel::None,
            ..Default::default()
        });
        Self {
            reader: PdfReader::new(),
            writer,
            compression,
        }
    }

    /// Compression level in effect.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }

    /// Build the combined document without writing it.
    ///
    /// Output page order is each entry's pages, entry after entry. Every
    /// distinct source is read from disk once, at call time.
    ///
    /// # Errors
    ///
    /// - [`BuckError::NothingToCombine`] if `entries` is empty
    /// - [`BuckError::ReadError`] if a source vanished, no longer parses, or
    ///   lost a page an entry refers to
    pub fn build<T: CatalogEntry>(&self, entries: &[T]) -> Result<CombineResult> {
        if entries.is_empty() {
            return Err(BuckError::NothingToCombine);
        }

        let start = Instant::now();
        let mut assembler = PageAssembler::new();
        let mut input_size = 0;

        for entry in entries {
            let path = entry.source_path();
            if !assembler.has_source(path) {
                let loaded = self.reader.load(path).map_err(into_read_error)?;
                input_size += loaded.file_size;
                assembler.import(loaded);
            }

            match entry.span() {
                PageSpan::All { .. } => assembler.push_all(path)?,
                PageSpan::Single(page_index) => assembler.push(path, page_index)?,
            }
        }

        let sources_read = assembler.source_count();
        let total_pages = assembler.page_count();
        let mut document = assembler.finish();
        if self.compression == CompressionLevel::Maximum {
            document.delete_zero_length_streams();
        }

        tracing::debug!(sources_read, total_pages, "built combined document");

        Ok(CombineResult {
            document,
            statistics: CombineStatistics {
                sources_read,
                total_pages,
                input_size,
                output_size: None,
                elapsed: start.elapsed(),
            },
        })
    }

    /// Combine `entries` and write the result to `output`.
    ///
    /// # Errors
    ///
    /// Everything [`build`](Self::build) reports, plus
    /// [`BuckError::InvalidConfig`] if `output` is one of the sources and
    /// [`BuckError::WriteError`] if `output` cannot be written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use buckutils::catalog::{Catalog, SourceDocument};
    /// use buckutils::combine::Combiner;
    /// use std::path::Path;
    ///
    /// # fn example() -> buckutils::Result<()> {
    /// let mut catalog: Catalog<SourceDocument> = Catalog::new();
    /// catalog.add(Path::new("a.pdf"))?;
    /// catalog.add(Path::new("b.pdf"))?;
    ///
    /// let stats = Combiner::new().combine(catalog.list(), Path::new("combined.pdf"))?;
    /// println!("{} pages", stats.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub fn combine<T: CatalogEntry>(&self, entries: &[T], output: &Path) -> Result<CombineStatistics> {
        ensure_output_is_not_a_source(entries, output)?;

        let start = Instant::now();
        let CombineResult {
            document,
            mut statistics,
        } = self.build(entries)?;

        let written = self.writer.save_with_stats(document, output)?;
        statistics.output_size = Some(written.file_size);
        statistics.elapsed = start.elapsed();

        tracing::debug!(
            output = %output.display(),
            pages = statistics.total_pages,
            size = written.file_size,
            "combined"
        );
        Ok(statistics)
    }
}

impl Default for Combiner {
    fn default() -> Self {
        Self::new()
    }
}

/// Writing over a source would leave the catalog describing a file that no
/// longer holds what was listed.
fn ensure_output_is_not_a_source<T: CatalogEntry>(entries: &[T], output: &Path) -> Result<()> {
    let resolved = output.canonicalize().ok();
    let clash = entries.iter().map(CatalogEntry::source_path).any(|source| {
        source == output
            || resolved
                .as_ref()
                .is_some_and(|out| source.canonicalize().is_ok_and(|src| &src == out))
    });

    if clash {
        return Err(BuckError::invalid_config(format!(
            "Output file cannot be the same as an input file: {}",
            output.display()
        )));
    }
    Ok(())
}

/// A source that was fine when added but cannot be loaded now.
fn into_read_error(err: BuckError) -> BuckError {
    match err {
        BuckError::InvalidFile { path, reason } => BuckError::ReadError { path, reason },
        other => other,
    }
}
