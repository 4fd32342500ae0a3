//! Failure modes and their exit codes.

use buckutils::catalog::{Catalog, SourceDocument};
use buckutils::error::BuckError;
use buckutils::io::PdfReader;
use lopdf::{Document, Object, dictionary};
use rstest::rstest;

use crate::common::Workspace;

#[test]
fn test_truncated_pdf_is_rejected() {
    let ws = Workspace::new();
    let good = ws.pdf("good.pdf", 1, 2);
    let bytes = std::fs::read(&good).unwrap();
    let truncated = ws.file("truncated.pdf", &bytes[..bytes.len() / 3]);

    let err = PdfReader::new().load(&truncated).unwrap_err();

    assert!(matches!(err, BuckError::InvalidFile { .. }), "{err:?}");
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_pdf_without_pages_is_rejected() {
    let ws = Workspace::new();
    let path = ws.join("empty.pdf");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path).unwrap();

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    let err = catalog.add(&path).unwrap_err();

    assert!(matches!(err, BuckError::InvalidFile { .. }), "{err:?}");
    assert!(catalog.is_empty());
}

#[test]
fn test_directory_is_not_a_pdf() {
    let ws = Workspace::new();
    let mut catalog: Catalog<SourceDocument> = Catalog::new();

    let err = catalog.add(ws.path()).unwrap_err();

    assert!(matches!(err, BuckError::InvalidFile { .. }), "{err:?}");
}

#[rstest]
#[case::invalid_file(BuckError::invalid_file("a.pdf", "bad"), 3, true)]
#[case::index(BuckError::index_out_of_range(4, 2), 1, true)]
#[case::read(BuckError::read_error("a.pdf", "gone"), 2, false)]
#[case::conflict(BuckError::name_conflict("b.pdf"), 4, true)]
#[case::nothing(BuckError::NothingToCombine, 1, true)]
#[case::cancelled(BuckError::Cancelled, 130, false)]
fn test_exit_codes(#[case] err: BuckError, #[case] code: i32, #[case] fixable: bool) {
    assert_eq!(err.exit_code(), code);
    assert_eq!(err.is_user_fixable(), fixable);
}

#[test]
fn test_error_messages_name_the_file() {
    let err = BuckError::invalid_file("/tmp/report.pdf", "missing %PDF- header");
    let message = err.to_string();

    assert!(message.contains("/tmp/report.pdf"));
    assert!(message.contains("missing %PDF- header"));
}
