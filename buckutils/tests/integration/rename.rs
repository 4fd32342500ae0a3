//! Renaming files in place.

use buckutils::error::BuckError;
use buckutils::rename::rename;
use buckutils::{Session, SourceDocument};

use crate::common::Workspace;

#[test]
fn test_rename_keeps_directory_and_extension() {
    let ws = Workspace::new();
    let source = ws.pdf("scan_0042.pdf", 1, 1);

    let renamed = rename(&source, "invoice-march").unwrap();

    assert_eq!(renamed, ws.join("invoice-march.pdf"));
    assert!(renamed.exists());
    assert!(!source.exists());
}

#[test]
fn test_rename_onto_existing_file_changes_nothing() {
    let ws = Workspace::new();
    let source = ws.pdf("a.pdf", 1, 1);
    let existing = ws.file("b.pdf", b"keep me");
    let before = std::fs::read(&source).unwrap();

    let err = rename(&source, "b").unwrap_err();

    assert!(matches!(err, BuckError::NameConflict { .. }), "{err:?}");
    assert_eq!(std::fs::read(&source).unwrap(), before);
    assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
}

#[test]
fn test_rename_missing_source_is_a_read_error() {
    let ws = Workspace::new();

    let err = rename(&ws.join("gone.pdf"), "new").unwrap_err();

    assert!(matches!(err, BuckError::ReadError { .. }), "{err:?}");
}

#[test]
fn test_session_rename_keeps_pick_after_conflict() {
    let ws = Workspace::new();
    let source = ws.pdf("a.pdf", 1, 1);
    ws.pdf("taken.pdf", 2, 1);

    let mut session: Session<SourceDocument> = Session::default();
    session.select_rename(&source);
    session.propose_name("taken").unwrap();
    assert!(matches!(
        session.apply_rename(),
        Err(BuckError::NameConflict { .. })
    ));
    assert!(session.rename_target().is_some());

    session.propose_name("free").unwrap();
    let renamed = session.apply_rename().unwrap();

    assert_eq!(renamed, ws.join("free.pdf"));
    assert!(session.rename_target().is_none());
}
