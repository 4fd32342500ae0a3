use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{CatalogEntry, PageSpan};
use crate::io::LoadedPdf;
use crate::preview::PreviewKey;

/// One user-added PDF file, combined as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    path: PathBuf,
    page_count: usize,
    display_name: String,
}

impl SourceDocument {
    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pages counted when the file was added.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// File name shown to users.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl CatalogEntry for SourceDocument {
    fn from_loaded(loaded: &LoadedPdf) -> Vec<Self> {
        vec![Self {
            path: loaded.path.clone(),
            page_count: loaded.page_count,
            display_name: loaded.display_name(),
        }]
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn span(&self) -> PageSpan {
        PageSpan::All {
            page_count: self.page_count,
        }
    }

    fn label(&self) -> String {
        let noun = if self.page_count == 1 { "page" } else { "pages" };
        format!("{} ({} {noun})", self.display_name, self.page_count)
    }

    fn preview_key(&self) -> PreviewKey {
        PreviewKey::new(&self.path, 0)
    }
}
