//! User-facing output for the command line.
//!
//! # Examples
//!
//! ```no_run
//! use buckutils::output::OutputFormatter;
//! use buckutils::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Reading 3 file(s)");
//! formatter.success("Combined into out.pdf");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::catalog::{Catalog, CatalogEntry};
use crate::combine::CombineStatistics;
use crate::io::PdfSummary;
use crate::preview::PagePreview;
use crate::utils::format_file_size;

/// Print the catalog as a numbered list.
pub fn display_catalog<T: CatalogEntry>(formatter: &OutputFormatter, catalog: &Catalog<T>) {
    if catalog.is_empty() {
        formatter.info("The list is empty. Add some PDF files first.");
        return;
    }
    for (index, entry) in catalog.list().iter().enumerate() {
        formatter.list_item(index + 1, &entry.label());
    }
}

/// Print the outcome of a combine.
pub fn display_combine_statistics(formatter: &OutputFormatter, stats: &CombineStatistics) {
    formatter.detail("Sources read", &stats.sources_read.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Time", &format!("{:.2}s", stats.elapsed.as_secs_f64()));

    let size = stats
        .format_output_size()
        .map(|size| format!(", {size}"))
        .unwrap_or_default();
    formatter.info(&format!(
        "{} page(s) from {} file(s){size}",
        stats.total_pages, stats.sources_read
    ));
}

/// Print what `inspect` found about one file.
pub fn display_summary(formatter: &OutputFormatter, summary: &PdfSummary) {
    formatter.section(&summary.name);
    formatter.list_item(1, &format!("Pages: {}", summary.page_count));
    formatter.list_item(2, &format!("PDF version: {}", summary.version));
    formatter.list_item(3, &format!("Size: {}", format_file_size(summary.file_size)));
    if let Some((width, height)) = summary.page_dimensions {
        formatter.list_item(4, &format!("First page: {width:.0} x {height:.0} pt"));
    }
}

/// Print one page preview.
pub fn display_preview(formatter: &OutputFormatter, preview: &PagePreview) {
    formatter.section(&preview.label);
    formatter.info(&format!("  {}", preview.text));
    if let Some(image) = &preview.image {
        formatter.info(&format!("  Image: {}", image.display()));
    }
}
