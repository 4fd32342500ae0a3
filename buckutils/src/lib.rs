//! buckutils - combine, reorder, preview and rename PDF files.
//!
//! The library keeps an ordered [`Catalog`] of source documents (or of single
//! pages), lets the user reorder it, and writes the catalog out as one PDF
//! with the [`Combiner`]. Page previews are rendered in the background and a
//! single file can be renamed in place.
//!
//! # Examples
//!
//! ## Combining documents
//!
//! ```no_run
//! use buckutils::{Catalog, Combiner, SourceDocument};
//! use std::path::Path;
//!
//! # fn example() -> buckutils::Result<()> {
//! let mut catalog: Catalog<SourceDocument> = Catalog::new();
//! catalog.add(Path::new("cover.pdf"))?;
//! catalog.add(Path::new("report.pdf"))?;
//! catalog.move_up(1)?;
//!
//! let stats = Combiner::new().combine(catalog.list(), Path::new("combined.pdf"))?;
//! println!("Wrote {} pages", stats.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reordering pages with previews
//!
//! ```no_run
//! use buckutils::{PageRef, Session};
//! use std::path::Path;
//!
//! # async fn example() -> buckutils::Result<()> {
//! let mut session: Session<PageRef> = Session::default();
//! session.add(Path::new("scan.pdf"))?;
//! session.refresh_previews().await;
//! session.move_down(0)?;
//! session.combine(Path::new("reordered.pdf"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod combine;
pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod preview;
pub mod rename;
pub mod session;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry, PageRef, SourceDocument};
pub use combine::Combiner;
pub use config::Config;
pub use error::{BuckError, Result};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
