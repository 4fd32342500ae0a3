//! One user's working state: a catalog, the tools that act on it, and the
//! file picked for renaming.
//!
//! A session is created by whoever drives the user interaction and passed
//! to the handlers that need it. Nothing here is global.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogEntry};
use crate::combine::{CombineStatistics, Combiner};
use crate::error::{BuckError, Result};
use crate::preview::{PagePreview, PreviewEvent, PreviewQueue, PreviewRenderer, PreviewRequest};
use crate::rename::RenameTarget;

/// Working state for combining and renaming files.
#[derive(Debug)]
pub struct Session<T: CatalogEntry> {
    catalog: Catalog<T>,
    combiner: Combiner,
    renderer: PreviewRenderer,
    rename: Option<RenameTarget>,
}

impl<T: CatalogEntry> Session<T> {
    /// Start a session with the given tools.
    pub fn new(combiner: Combiner, renderer: PreviewRenderer) -> Self {
        Self {
            catalog: Catalog::new(),
            combiner,
            renderer,
            rename: None,
        }
    }

    /// The catalog, read-only.
    pub fn catalog(&self) -> &Catalog<T> {
        &self.catalog
    }

    /// Add a file to the catalog.
    pub fn add(&mut self, path: &Path) -> Result<usize> {
        self.catalog.add(path)
    }

    /// Remove the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.catalog.remove(index)
    }

    /// Remove several entries at once.
    pub fn remove_selected(&mut self, indices: &[usize]) -> Result<Vec<T>> {
        self.catalog.remove_selected(indices)
    }

    /// Move an entry one place up.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.catalog.move_up(index)
    }

    /// Move an entry one place down.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.catalog.move_down(index)
    }

    /// Exchange two entries.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.catalog.swap(a, b)
    }

    /// Entries in output order.
    pub fn list(&self) -> &[T] {
        self.catalog.list()
    }

    /// Drop every entry and its preview images.
    pub fn clear(&mut self) {
        self.catalog.clear();
    }

    /// Pages still waiting for a preview.
    pub fn preview_requests(&self) -> Vec<PreviewRequest> {
        self.catalog.preview_requests()
    }

    /// Store a finished preview.
    pub fn apply_preview(&mut self, preview: PagePreview) -> bool {
        self.catalog.apply_preview(preview)
    }

    /// Preview of the entry at `index`, if one has been applied.
    pub fn preview(&self, index: usize) -> Result<Option<&PagePreview>> {
        self.catalog.preview(index)
    }

    /// A queue that renders with this session's renderer.
    pub fn preview_queue(&self) -> PreviewQueue {
        PreviewQueue::new(self.renderer.clone())
    }

    /// Render every missing preview and apply the results.
    ///
    /// Returns the number of previews applied.
    pub async fn refresh_previews(&mut self) -> usize {
        let requests = self.preview_requests();
        if requests.is_empty() {
            return 0;
        }

        let mut rx = self.preview_queue().spawn(requests);
        let mut applied = 0;
        while let Some(event) = rx.recv().await {
            match event {
                PreviewEvent::Ready(preview) => {
                    if self.apply_preview(preview) {
                        applied += 1;
                    }
                }
                PreviewEvent::Failed { key, reason } => {
                    tracing::warn!(
                        path = %key.path.display(),
                        page = key.page_index + 1,
                        reason = %reason,
                        "preview worker failed"
                    );
                }
            }
        }
        applied
    }

    /// Combine the catalog into `output`.
    pub fn combine(&self, output: &Path) -> Result<CombineStatistics> {
        self.combiner.combine(self.catalog.list(), output)
    }

    /// Pick the file to rename. Replaces any earlier pick.
    pub fn select_rename(&mut self, path: impl Into<PathBuf>) {
        self.rename = Some(RenameTarget::new(path));
    }

    /// The current rename pick.
    pub fn rename_target(&self) -> Option<&RenameTarget> {
        self.rename.as_ref()
    }

    /// Propose a name for the picked file.
    pub fn propose_name(&mut self, name: impl Into<String>) -> Result<()> {
        let target = self
            .rename
            .as_mut()
            .ok_or_else(|| BuckError::other("No file selected for renaming"))?;
        target.propose(name);
        Ok(())
    }

    /// Rename the picked file.
    ///
    /// On success the pick is cleared and the new path returned. On failure
    /// the pick is kept so another name can be tried.
    pub fn apply_rename(&mut self) -> Result<PathBuf> {
        let target = self
            .rename
            .as_ref()
            .ok_or_else(|| BuckError::other("No file selected for renaming"))?;
        let renamed = target.apply()?;
        self.rename = None;
        Ok(renamed)
    }
}

impl<T: CatalogEntry> Default for Session<T> {
    fn default() -> Self {
        Self::new(Combiner::new(), PreviewRenderer::default())
    }
}
