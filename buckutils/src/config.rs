//! Configuration for combine, preview and rename runs.
//!
//! Command line arguments are turned into a [`Config`] which is validated
//! once before any file is touched. The same option types are used by an
//! interactive [`Session`](crate::session::Session).

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{BuckError, Result};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Write streams exactly as they were read.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop every object no page can reach.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = BuckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(BuckError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Ask before overwriting.
    #[default]
    Prompt,
    /// Always overwrite.
    Force,
    /// Never overwrite, error if the file exists.
    NoClobber,
}

/// What a single catalog entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Whole documents are reordered.
    #[default]
    Document,
    /// Individual pages are reordered, across documents.
    Page,
}

impl FromStr for Granularity {
    type Err = BuckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "document" | "documents" | "doc" => Ok(Self::Document),
            "page" | "pages" => Ok(Self::Page),
            _ => Err(BuckError::invalid_config(format!(
                "Invalid granularity: {s}. Must be 'document' or 'page'"
            ))),
        }
    }
}

/// Settings for page previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Maximum number of characters kept from the page text.
    pub text_limit: usize,
    /// Render PNG thumbnails when Ghostscript is available.
    pub render_images: bool,
    /// Thumbnail resolution in dots per inch.
    pub resolution: u32,
    /// Number of preview workers (None = one per CPU core).
    pub workers: Option<usize>,
    /// Explicit Ghostscript executable, skipping discovery.
    pub ghostscript: Option<PathBuf>,
    /// Directory receiving thumbnails (None = system temp dir).
    pub output_dir: Option<PathBuf>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            text_limit: 240,
            render_images: true,
            resolution: 50,
            workers: None,
            ghostscript: None,
            output_dir: None,
        }
    }
}

impl PreviewOptions {
    /// Get the effective number of preview workers.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Directory thumbnails are written to.
    pub fn thumbnail_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Upper bound on the number of pages a selection may name.
const MAX_SELECTED_PAGES: usize = 100_000;

/// One page picked from one input document, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    /// 1-based position of the document among the inputs.
    pub document: usize,
    /// 1-based page number inside that document.
    pub page: u32,
}

/// An explicit page order across several input documents.
///
/// Written as comma separated `DOC:PAGES` items where `PAGES` is a page
/// number or an inclusive range:
/// - `"2:1"` - first page of the second input
/// - `"1:1-3"` - pages 1 to 3 of the first input
/// - `"2:1,1:1-3,2:2"` - interleaved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    slots: Vec<PageSlot>,
}

impl PageSelection {
    /// Parse a page selection string.
    ///
    /// # Examples
    ///
    /// ```
    /// use buckutils::config::PageSelection;
    ///
    /// let selection = PageSelection::parse("2:1,1:1-2").unwrap();
    /// assert_eq!(selection.len(), 3);
    /// assert_eq!(selection.slots()[0].document, 2);
    /// ```
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let mut slots = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let Some((document, pages)) = part.split_once(':') else {
                bail!("Invalid page selection item: {part}. Expected format like '1:2' or '1:2-5'");
            };

            let document: usize = document
                .trim()
                .parse()
                .with_context(|| format!("Invalid document number: {document}"))?;
            if document == 0 {
                bail!("Document numbers must be positive (1-indexed)");
            }

            let (start, end) = match pages.split_once('-') {
                Some((start, end)) => (start, end),
                None => (pages, pages),
            };
            let start: u32 = start
                .trim()
                .parse()
                .with_context(|| format!("Invalid page number: {start}"))?;
            let end: u32 = end
                .trim()
                .parse()
                .with_context(|| format!("Invalid page number: {end}"))?;

            if start == 0 || end == 0 {
                bail!("Page numbers must be positive (1-indexed)");
            }
            if start > end {
                bail!("Invalid range {start}-{end}: start page must not exceed end page");
            }

            if slots.len() + (end - start) as usize >= MAX_SELECTED_PAGES {
                bail!("Page selection is too large (more than {MAX_SELECTED_PAGES} pages)");
            }

            slots.extend((start..=end).map(|page| PageSlot { document, page }));
        }

        if slots.is_empty() {
            bail!("Page selection cannot be empty");
        }

        Ok(Self { slots })
    }

    /// The selected pages in output order.
    pub fn slots(&self) -> &[PageSlot] {
        &self.slots
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Highest document number referenced.
    pub fn max_document(&self) -> usize {
        self.slots.iter().map(|slot| slot.document).max().unwrap_or(0)
    }
}

/// Complete configuration for a one-shot combine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths, in catalog order.
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Explicit page order; switches the run to page granularity.
    pub page_order: Option<PageSelection>,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Validate and report without writing.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Granularity implied by the configuration.
    pub fn granularity(&self) -> Granularity {
        if self.page_order.is_some() {
            Granularity::Page
        } else {
            Granularity::Document
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also an input
    /// - The page order names a document that is not among the inputs
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.inputs.iter().any(|input| input == &self.output) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            );
        }

        if let Some(order) = &self.page_order
            && order.max_document() > self.inputs.len()
        {
            bail!(
                "Page order refers to document {} but only {} input(s) were given",
                order.max_document(),
                self.inputs.len()
            );
        }

        Ok(())
    }

    /// Check if progress output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
