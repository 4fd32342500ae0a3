//! Catalog behavior seen through the public API.

use buckutils::catalog::{Catalog, CatalogEntry, PageRef, SourceDocument};
use buckutils::error::BuckError;
use rstest::rstest;

use crate::common::Workspace;

fn names(catalog: &Catalog<SourceDocument>) -> Vec<String> {
    catalog
        .list()
        .iter()
        .map(|d| d.display_name().to_string())
        .collect()
}

#[test]
fn test_length_equals_adds_minus_removes() {
    let ws = Workspace::new();
    let paths = [
        ws.pdf("a.pdf", 1, 1),
        ws.pdf("b.pdf", 2, 2),
        ws.pdf("c.pdf", 3, 3),
        ws.pdf("d.pdf", 4, 1),
    ];

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    let mut adds = 0;
    let mut removes = 0;

    for (step, path) in paths.iter().enumerate() {
        adds += catalog.add(path).unwrap();
        catalog.move_up(catalog.len() - 1).unwrap();
        catalog.move_down(0).unwrap();
        if step % 2 == 1 {
            catalog.remove(0).unwrap();
            removes += 1;
        }
    }

    assert_eq!(catalog.list().len(), adds - removes);
}

#[test]
fn test_move_up_on_first_and_move_down_on_last_are_no_ops() {
    let ws = Workspace::new();
    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 1)).unwrap();
    catalog.add(&ws.pdf("b.pdf", 2, 1)).unwrap();
    catalog.add(&ws.pdf("c.pdf", 3, 1)).unwrap();

    assert_eq!(catalog.move_up(0).unwrap(), 0);
    assert_eq!(catalog.move_down(2).unwrap(), 2);
    assert_eq!(names(&catalog), vec!["a.pdf", "b.pdf", "c.pdf"]);
}

#[rstest]
#[case::plain_text(b"just text".as_slice())]
#[case::empty(b"".as_slice())]
#[case::truncated_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj".as_slice())]
#[case::png(b"\x89PNG\r\n\x1a\n".as_slice())]
fn test_adding_a_non_pdf_fails_and_leaves_catalog_unchanged(#[case] contents: &[u8]) {
    let ws = Workspace::new();
    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();

    let bogus = ws.file("bogus.pdf", contents);
    let err = catalog.add(&bogus).unwrap_err();

    assert!(matches!(err, BuckError::InvalidFile { .. }), "{err:?}");
    assert_eq!(names(&catalog), vec!["a.pdf"]);
}

#[test]
fn test_page_catalog_lists_every_page() {
    let ws = Workspace::new();
    let mut catalog: Catalog<PageRef> = Catalog::new();
    catalog.add(&ws.pdf("report.pdf", 1, 3)).unwrap();

    let labels: Vec<String> = catalog.list().iter().map(|p| p.label().to_string()).collect();
    assert_eq!(
        labels,
        vec![
            "report.pdf - Page 1",
            "report.pdf - Page 2",
            "report.pdf - Page 3"
        ]
    );
}

#[test]
fn test_invalid_indices_are_reported() {
    let ws = Workspace::new();
    let mut catalog: Catalog<PageRef> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();

    assert!(matches!(
        catalog.remove(2),
        Err(BuckError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(
        catalog.swap(0, 5),
        Err(BuckError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        catalog.preview(9),
        Err(BuckError::IndexOutOfRange { .. })
    ));
    assert_eq!(catalog.len(), 2);
}
