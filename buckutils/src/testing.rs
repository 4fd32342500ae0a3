//! PDF fixtures for unit tests.
//!
//! Every page gets a MediaBox whose width is `100 * marker + page_number`,
//! so the origin of a page in a combined file can be read back from its
//! width. Page text reads `Document <marker> page <n>`.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Build an in-memory document with `pages` pages.
///
/// Resources live on the page tree root and are inherited by every page.
pub fn build_test_document(marker: u32, pages: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page_no in 1..=pages {
        let text = format!("Document {marker} page {page_no}");
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![20.into(), 100.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap(),
        ));
        let width = (100 * marker + page_no) as i64;
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 200.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a fixture document to `dir/name` and return its path.
pub fn write_test_pdf(dir: &Path, name: &str, marker: u32, pages: u32) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_test_document(marker, pages);
    doc.save(&path).unwrap();
    path
}

/// Width of every page of `path`, in output order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let mediabox = page.get(b"MediaBox").unwrap().as_array().unwrap();
            mediabox[2].as_float().unwrap().round() as i64
        })
        .collect()
}
