//! Background previews applied to a catalog.

use buckutils::catalog::{Catalog, PageRef, SourceDocument};
use buckutils::combine::Combiner;
use buckutils::preview::queue::{PreviewEvent, PreviewQueue};
use buckutils::preview::{PreviewRenderer, NO_TEXT_PLACEHOLDER};
use buckutils::Session;

use crate::common::Workspace;

fn text_session<T: buckutils::CatalogEntry>() -> Session<T> {
    Session::new(Combiner::new(), PreviewRenderer::text_only())
}

#[tokio::test]
async fn test_queue_renders_every_request() {
    let ws = Workspace::new();
    let mut catalog: Catalog<PageRef> = Catalog::new();
    catalog.add(&ws.pdf("a.pdf", 1, 3)).unwrap();
    catalog.add(&ws.pdf("b.pdf", 2, 2)).unwrap();

    let queue = PreviewQueue::with_workers(PreviewRenderer::text_only(), 2);
    let events = queue.run(catalog.preview_requests()).await;

    assert_eq!(events.len(), 5);
    for event in events {
        match event {
            PreviewEvent::Ready(preview) => {
                assert!(preview.image.is_none());
                assert!(catalog.apply_preview(preview));
            }
            PreviewEvent::Failed { key, reason } => {
                panic!("preview of {key:?} failed: {reason}")
            }
        }
    }

    let preview = catalog.preview(4).unwrap().unwrap();
    assert!(preview.text.contains("Page 2 of document 2"), "{}", preview.text);
}

#[tokio::test]
async fn test_session_refresh_fills_every_preview() {
    let ws = Workspace::new();
    let mut session: Session<SourceDocument> = text_session();
    session.add(&ws.pdf("a.pdf", 1, 2)).unwrap();
    session.add(&ws.pdf("b.pdf", 2, 1)).unwrap();

    assert_eq!(session.refresh_previews().await, 2);
    assert!(session.preview_requests().is_empty());

    let first = session.preview(0).unwrap().unwrap();
    assert!(first.text.contains("Page 1 of document 1"), "{}", first.text);
    assert_ne!(first.text, NO_TEXT_PLACEHOLDER);
}

#[tokio::test]
async fn test_preview_for_removed_entry_is_discarded() {
    let ws = Workspace::new();
    let a = ws.pdf("a.pdf", 1, 1);
    let mut session: Session<SourceDocument> = text_session();
    session.add(&a).unwrap();

    let requests = session.preview_requests();
    session.remove(0).unwrap();

    let events = session.preview_queue().run(requests).await;
    for event in events {
        if let PreviewEvent::Ready(preview) = event {
            assert!(!session.apply_preview(preview));
        }
    }
    assert!(session.list().is_empty());
}

#[tokio::test]
async fn test_catalog_stays_usable_while_previews_render() {
    let ws = Workspace::new();
    let mut session: Session<PageRef> = text_session();
    session.add(&ws.pdf("a.pdf", 1, 4)).unwrap();

    let mut rx = session.preview_queue().spawn(session.preview_requests());
    session.move_down(0).unwrap();
    session.swap(1, 3).unwrap();

    while let Some(event) = rx.recv().await {
        if let PreviewEvent::Ready(preview) = event {
            session.apply_preview(preview);
        }
    }

    let labels: Vec<usize> = session.list().iter().map(|p| p.page_number()).collect();
    assert_eq!(labels, vec![2, 4, 3, 1]);
    let first = session.preview(0).unwrap().unwrap();
    assert!(first.text.contains("Page 2 of document 1"), "{}", first.text);
}
