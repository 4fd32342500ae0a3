#![no_main]

use buckutils::catalog::{Catalog, SourceDocument};
use buckutils::error::BuckError;
use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;
use std::sync::OnceLock;

static SCRATCH: OnceLock<PathBuf> = OnceLock::new();

fn scratch_file() -> &'static PathBuf {
    SCRATCH.get_or_init(|| {
        std::env::temp_dir().join(format!("buckutils-fuzz-{}.pdf", std::process::id()))
    })
}

fuzz_target!(|data: &[u8]| {
    let path = scratch_file();
    if std::fs::write(path, data).is_err() {
        return;
    }

    let mut catalog: Catalog<SourceDocument> = Catalog::new();
    match catalog.add(path) {
        Ok(added) => assert_eq!(catalog.len(), added),
        // A rejected file must leave the catalog untouched
        Err(BuckError::InvalidFile { .. }) => assert!(catalog.is_empty()),
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
