#![no_main]

use buckutils::config::PageSelection;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(selection) = PageSelection::parse(s) {
        assert!(!selection.is_empty());
        assert!(selection
            .slots()
            .iter()
            .all(|slot| slot.document > 0 && slot.page > 0));
    }
});
