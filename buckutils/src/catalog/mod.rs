//! The ordered list of sources waiting to be combined.
//!
//! A [`Catalog`] holds either whole documents ([`SourceDocument`]) or single
//! pages ([`PageRef`]); both implement [`CatalogEntry`] and share every
//! operation. Insertion order is output order.
//!
//! # Examples
//!
//! ```no_run
//! use buckutils::catalog::{Catalog, SourceDocument};
//! use std::path::Path;
//!
//! # fn example() -> buckutils::Result<()> {
//! let mut catalog: Catalog<SourceDocument> = Catalog::new();
//! catalog.add(Path::new("cover.pdf"))?;
//! catalog.add(Path::new("body.pdf"))?;
//! catalog.move_up(1)?;
//! assert_eq!(catalog.list()[0].display_name(), "body.pdf");
//! # Ok(())
//! # }
//! ```

mod document;
mod page;

pub use document::SourceDocument;
pub use page::PageRef;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{BuckError, Result};
use crate::io::{LoadedPdf, PdfReader};
use crate::preview::{PagePreview, PreviewKey, PreviewRequest};

/// Which pages of its source a catalog entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSpan {
    /// Every page, in document order.
    All {
        /// Pages counted when the entry was added.
        page_count: usize,
    },
    /// One page, zero-based.
    Single(usize),
}

/// A unit that can live in a [`Catalog`].
pub trait CatalogEntry: Clone + Send + Sync + 'static {
    /// Entries derived from a freshly loaded file.
    fn from_loaded(loaded: &LoadedPdf) -> Vec<Self>;

    /// File the entry reads from.
    fn source_path(&self) -> &Path;

    /// Pages the entry contributes to the output.
    fn span(&self) -> PageSpan;

    /// Text shown for the entry in a listing.
    fn label(&self) -> String;

    /// Whether `other` is the same unit, so importing it again is skipped.
    fn is_same_unit(&self, _other: &Self) -> bool {
        false
    }

    /// Page used to preview the entry.
    fn preview_key(&self) -> PreviewKey;
}

/// Ordered, user-editable list of entries.
#[derive(Debug, Clone)]
pub struct Catalog<T: CatalogEntry> {
    entries: Vec<T>,
    previews: HashMap<PreviewKey, PagePreview>,
    reader: PdfReader,
}

impl<T: CatalogEntry> Catalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            previews: HashMap::new(),
            reader: PdfReader::new(),
        }
    }

    /// Validate `path` and append the entries it yields.
    ///
    /// Returns how many entries were appended. Page entries already in the
    /// catalog are skipped, so this can be zero.
    ///
    /// # Errors
    ///
    /// Returns [`BuckError::InvalidFile`] if the file is unreadable, not a
    /// PDF, encrypted, or has no pages. The catalog is left unchanged.
    pub fn add(&mut self, path: &Path) -> Result<usize> {
        let loaded = self.reader.load(path)?;

        let fresh: Vec<T> = T::from_loaded(&loaded)
            .into_iter()
            .filter(|candidate| !self.entries.iter().any(|e| e.is_same_unit(candidate)))
            .collect();
        let added = fresh.len();
        self.entries.extend(fresh);

        tracing::debug!(path = %path.display(), added, len = self.entries.len(), "catalog add");
        Ok(added)
    }

    /// Add several files, stopping at the first failure.
    ///
    /// Files added before the failure stay in the catalog.
    pub fn add_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize> {
        let mut added = 0;
        for path in paths {
            added += self.add(path.as_ref())?;
        }
        Ok(added)
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        self.prune_previews();

        tracing::debug!(index, len = self.entries.len(), "catalog remove");
        Ok(removed)
    }

    /// Remove several entries at once.
    ///
    /// Every index is checked before anything is removed. Duplicate indices
    /// count once. Removed entries are returned in their catalog order.
    pub fn remove_selected(&mut self, indices: &[usize]) -> Result<Vec<T>> {
        for &index in indices {
            self.check_index(index)?;
        }

        let mut unique: Vec<usize> = indices
            .iter()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        unique.sort_unstable_by(|a, b| b.cmp(a));

        let mut removed: Vec<T> = unique
            .into_iter()
            .map(|index| self.entries.remove(index))
            .collect();
        removed.reverse();
        self.prune_previews();

        tracing::debug!(removed = removed.len(), len = self.entries.len(), "catalog remove_selected");
        Ok(removed)
    }

    /// Move the entry at `index` one place towards the front.
    ///
    /// Returns the entry's new index. The first entry stays where it is.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(0);
        }
        self.entries.swap(index, index - 1);
        tracing::debug!(from = index, to = index - 1, "catalog move");
        Ok(index - 1)
    }

    /// Move the entry at `index` one place towards the back.
    ///
    /// Returns the entry's new index. The last entry stays where it is.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index + 1 == self.entries.len() {
            return Ok(index);
        }
        self.entries.swap(index, index + 1);
        tracing::debug!(from = index, to = index + 1, "catalog move");
        Ok(index + 1)
    }

    /// Exchange two entries.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.entries.swap(a, b);
        tracing::debug!(a, b, "catalog swap");
        Ok(())
    }

    /// Entries in output order.
    pub fn list(&self) -> &[T] {
        &self.entries
    }

    /// Entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and delete every preview image.
    pub fn clear(&mut self) {
        self.entries.clear();
        for (_, preview) in self.previews.drain() {
            remove_preview_image(&preview);
        }
        tracing::debug!("catalog cleared");
    }

    /// Store a finished preview.
    ///
    /// Returns `false` and discards the preview if no entry uses that page
    /// any more.
    pub fn apply_preview(&mut self, preview: PagePreview) -> bool {
        let wanted = self.entries.iter().any(|e| e.preview_key() == preview.key);
        if !wanted {
            remove_preview_image(&preview);
            return false;
        }
        let key = preview.key.clone();
        if let Some(old) = self.previews.insert(key.clone(), preview)
            && old.image != self.previews[&key].image
        {
            remove_preview_image(&old);
        }
        true
    }

    /// Preview of the entry at `index`, once one has been applied.
    pub fn preview(&self, index: usize) -> Result<Option<&PagePreview>> {
        self.check_index(index)?;
        Ok(self.previews.get(&self.entries[index].preview_key()))
    }

    /// Pages that still need a preview, each listed once.
    pub fn preview_requests(&self) -> Vec<PreviewRequest> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|entry| {
                let key = entry.preview_key();
                if self.previews.contains_key(&key) || !seen.insert(key.clone()) {
                    return None;
                }
                Some(PreviewRequest {
                    key,
                    label: entry.label(),
                })
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(BuckError::index_out_of_range(index, self.entries.len()))
        }
    }

    fn prune_previews(&mut self) {
        let live: HashSet<PreviewKey> = self.entries.iter().map(|e| e.preview_key()).collect();
        let stale: Vec<PreviewKey> = self
            .previews
            .keys()
            .filter(|key| !live.contains(*key))
            .cloned()
            .collect();
        let removed: Vec<PagePreview> = stale
            .iter()
            .filter_map(|key| self.previews.remove(key))
            .collect();

        let still_shown: HashSet<&Path> = self
            .previews
            .values()
            .filter_map(|p| p.image.as_deref())
            .collect();
        for preview in removed {
            if preview
                .image
                .as_deref()
                .is_some_and(|image| still_shown.contains(image))
            {
                continue;
            }
            remove_preview_image(&preview);
        }
    }
}

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_preview_image(preview: &PagePreview) {
    let Some(image) = &preview.image else {
        return;
    };
    if let Err(err) = std::fs::remove_file(image)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %image.display(), error = %err, "could not delete preview image");
    }
}
