//! Reading and writing PDF files.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader, PdfSummary, display_name};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
