use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{CatalogEntry, PageSpan};
use crate::io::LoadedPdf;
use crate::preview::PreviewKey;

/// One page of a user-added PDF, reordered on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    source_path: PathBuf,
    page_index: usize,
    label: String,
}

impl PageRef {
    /// File the page comes from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Zero-based index of the page in its file.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// 1-based page number, as shown to users.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}

impl CatalogEntry for PageRef {
    fn from_loaded(loaded: &LoadedPdf) -> Vec<Self> {
        let name = loaded.display_name();
        (0..loaded.page_count)
            .map(|page_index| Self {
                source_path: loaded.path.clone(),
                page_index,
                label: format!("{name} - Page {}", page_index + 1),
            })
            .collect()
    }

    fn source_path(&self) -> &Path {
        &self.source_path
    }

    fn span(&self) -> PageSpan {
        PageSpan::Single(self.page_index)
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn is_same_unit(&self, other: &Self) -> bool {
        self.source_path == other.source_path && self.page_index == other.page_index
    }

    fn preview_key(&self) -> PreviewKey {
        PreviewKey::new(&self.source_path, self.page_index)
    }
}
