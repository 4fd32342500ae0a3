//! End-to-end combines checked page by page.

use buckutils::catalog::{Catalog, PageRef, SourceDocument};
use buckutils::combine::{Combiner, select_pages};
use buckutils::config::{CompressionLevel, PageSelection};
use buckutils::error::BuckError;
use rstest::rstest;

use crate::common::{Workspace, page_widths};

#[test]
fn test_documents_are_combined_in_catalog_order() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", 1, 2);
    let b = ws.pdf("b.pdf", 2, 3);
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&a).unwrap();
    catalog.add(&b).unwrap();

    let stats = Combiner::new().combine(catalog.list(), &output).unwrap();

    assert_eq!(stats.total_pages, 5);
    assert_eq!(stats.sources_read, 2);
    assert!(stats.output_size.unwrap() > 0);
    assert_eq!(page_widths(&output), vec![101, 102, 201, 202, 203]);
}

#[test]
fn test_reordered_documents_are_combined_in_new_order() {
    let ws = Workspace::new();
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();
    catalog.add(&ws.pdf("b.pdf", 2, 3)).unwrap();
    catalog.move_up(1).unwrap();

    Combiner::new().combine(catalog.list(), &output).unwrap();

    assert_eq!(page_widths(&output), vec![201, 202, 203, 101, 102]);
}

#[test]
fn test_reversed_catalog_reverses_groups_but_not_pages() {
    let ws = Workspace::new();
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();
    catalog.add(&ws.pdf("b.pdf", 2, 3)).unwrap();
    catalog.add(&ws.pdf("c.pdf", 3, 1)).unwrap();

    // Bring the last entry forward to each slot in turn, using moves only.
    let last = catalog.len() - 1;
    for slot in 0..last {
        for index in (slot + 1..=last).rev() {
            catalog.move_up(index).unwrap();
        }
    }

    Combiner::new().combine(catalog.list(), &output).unwrap();

    assert_eq!(page_widths(&output), vec![301, 201, 202, 203, 101, 102]);
}

#[test]
fn test_pages_can_be_interleaved_across_documents() {
    let ws = Workspace::new();
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<PageRef> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();
    catalog.add(&ws.pdf("b.pdf", 2, 2)).unwrap();
    // a1 a2 b1 b2 -> b2 a1 a2 b1
    catalog.move_up(3).unwrap();
    catalog.move_up(2).unwrap();
    catalog.move_up(1).unwrap();

    Combiner::new().combine(catalog.list(), &output).unwrap();

    assert_eq!(page_widths(&output), vec![202, 101, 102, 201]);
}

#[test]
fn test_page_selection_drives_output_order() {
    let ws = Workspace::new();
    let inputs = vec![ws.pdf("a.pdf", 1, 3), ws.pdf("b.pdf", 2, 2)];
    let output = ws.join("out.pdf");

    let selection = PageSelection::parse("2:2,1:1-2,2:2").unwrap();
    let pages = select_pages(&inputs, &selection).unwrap();
    let stats = Combiner::new().combine(&pages, &output).unwrap();

    assert_eq!(stats.total_pages, 4);
    assert_eq!(stats.sources_read, 2);
    assert_eq!(page_widths(&output), vec![202, 101, 102, 202]);
}

#[test]
fn test_build_does_not_write_anything() {
    let ws = Workspace::new();
    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();

    let result = Combiner::new().build(catalog.list()).unwrap();

    assert_eq!(result.statistics.total_pages, 2);
    assert!(result.statistics.output_size.is_none());
    assert_eq!(result.document.get_pages().len(), 2);
    assert!(!ws.join("out.pdf").exists());
}

#[rstest]
#[case::none(CompressionLevel::None)]
#[case::standard(CompressionLevel::Standard)]
#[case::maximum(CompressionLevel::Maximum)]
fn test_every_compression_level_keeps_pages(#[case] level: CompressionLevel) {
    let ws = Workspace::new();
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 3, 3)).unwrap();

    Combiner::with_compression(level)
        .combine(catalog.list(), &output)
        .unwrap();

    assert_eq!(page_widths(&output), vec![301, 302, 303]);
}

#[test]
fn test_combine_into_missing_directory_is_a_write_error() {
    let ws = Workspace::new();
    let output = ws.join("missing").join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 1)).unwrap();

    let err = Combiner::new().combine(catalog.list(), &output).unwrap_err();

    assert!(matches!(err, BuckError::WriteError { .. }), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn test_combine_replaces_an_existing_output() {
    let ws = Workspace::new();
    let output = ws.file("out.pdf", b"stale");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 2)).unwrap();

    Combiner::new().combine(catalog.list(), &output).unwrap();

    assert_eq!(page_widths(&output), vec![101, 102]);
    let leftovers: Vec<_> = std::fs::read_dir(ws.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_source_deleted_after_add_is_a_read_error() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", 1, 1);
    let b = ws.pdf("b.pdf", 2, 1);
    let output = ws.join("out.pdf");

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    catalog.add(&a).unwrap();
    catalog.add(&b).unwrap();
    std::fs::remove_file(&b).unwrap();

    let err = Combiner::new().combine(catalog.list(), &output).unwrap_err();

    assert!(matches!(err, BuckError::ReadError { ref path, .. } if path == &b), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn test_empty_catalog_has_nothing_to_combine() {
    let ws = Workspace::new();
    let catalog: Catalog<SourceDocument> = Catalog::new();

    let err = Combiner::new()
        .combine(catalog.list(), &ws.join("out.pdf"))
        .unwrap_err();

    assert!(matches!(err, BuckError::NothingToCombine));
}
