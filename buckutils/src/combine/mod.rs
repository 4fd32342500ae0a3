//! Producing the single output document.

pub mod assembler;
pub mod combiner;

pub use assembler::PageAssembler;
pub use combiner::{CombineResult, CombineStatistics, Combiner};

use std::path::PathBuf;

use crate::catalog::{Catalog, PageRef};
use crate::config::PageSelection;
use crate::error::{BuckError, Result};

/// Turn an explicit page selection over `inputs` into page entries.
///
/// Every input is validated as it would be by [`Catalog::add`]. A page may
/// be selected more than once.
///
/// # Errors
///
/// Returns [`BuckError::InvalidFile`] for an unusable input and
/// [`BuckError::InvalidConfig`] for a selection naming a missing document
/// or page.
pub fn select_pages(inputs: &[PathBuf], selection: &PageSelection) -> Result<Vec<PageRef>> {
    let mut catalog: Catalog<PageRef> = Catalog::new();
    catalog.add_all(inputs)?;

    selection
        .slots()
        .iter()
        .map(|slot| {
            let path = inputs.get(slot.document - 1).ok_or_else(|| {
                BuckError::invalid_config(format!(
                    "document {} was selected but only {} input(s) were given",
                    slot.document,
                    inputs.len()
                ))
            })?;
            catalog
                .list()
                .iter()
                .find(|page| page.source_path() == path && page.page_number() == slot.page as usize)
                .cloned()
                .ok_or_else(|| {
                    BuckError::invalid_config(format!(
                        "{} has no page {}",
                        path.display(),
                        slot.page
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_widths, write_test_pdf};
    use tempfile::TempDir;

    #[test]
    fn test_select_pages_interleaves_documents() {
        let dir = TempDir::new().unwrap();
        let a = write_test_pdf(dir.path(), "a.pdf", 1, 3);
        let b = write_test_pdf(dir.path(), "b.pdf", 2, 2);
        let output = dir.path().join("out.pdf");

        let selection = PageSelection::parse("2:2,1:1-2,2:1,1:1").unwrap();
        let pages = select_pages(&[a, b], &selection).unwrap();
        assert_eq!(pages.len(), 5);

        Combiner::new().combine(&pages, &output).unwrap();
        assert_eq!(page_widths(&output), vec![202, 101, 102, 201, 101]);
    }

    #[test]
    fn test_select_missing_page() {
        let dir = TempDir::new().unwrap();
        let a = write_test_pdf(dir.path(), "a.pdf", 1, 1);

        let selection = PageSelection::parse("1:2").unwrap();
        let err = select_pages(&[a], &selection).unwrap_err();
        assert!(matches!(err, BuckError::InvalidConfig { .. }));
    }

    #[test]
    fn test_select_missing_document() {
        let dir = TempDir::new().unwrap();
        let a = write_test_pdf(dir.path(), "a.pdf", 1, 1);

        let selection = PageSelection::parse("3:1").unwrap();
        let err = select_pages(&[a], &selection).unwrap_err();
        assert!(matches!(err, BuckError::InvalidConfig { .. }));
    }
}
