//! Page-level assembly of an output document from several sources.
//!
//! Each source is imported once: its objects are renumbered past the output's
//! highest id and moved in, minus its catalog and page tree. Pages are then
//! pushed in any order, any number of times, under a fresh page tree root.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{BuckError, Result};
use crate::io::LoadedPdf;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Builds one document out of pages taken from imported sources.
#[derive(Debug)]
pub struct PageAssembler {
    output: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    sources: HashMap<PathBuf, Vec<ObjectId>>,
    placed: HashSet<ObjectId>,
}

impl PageAssembler {
    /// Start an empty output document.
    pub fn new() -> Self {
        let mut output = Document::with_version("1.5");
        let pages_id = output.new_object_id();
        Self {
            output,
            pages_id,
            kids: Vec::new(),
            sources: HashMap::new(),
            placed: HashSet::new(),
        }
    }

    /// Whether `path` has already been imported.
    pub fn has_source(&self, path: &Path) -> bool {
        self.sources.contains_key(path)
    }

    /// Number of sources imported so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of pages in the source imported from `path`.
    pub fn source_page_count(&self, path: &Path) -> Option<usize> {
        self.sources.get(path).map(Vec::len)
    }

    /// Number of pages pushed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Move a loaded source into the output document.
    ///
    /// Returns the number of pages the source provides.
    pub fn import(&mut self, loaded: LoadedPdf) -> usize {
        let LoadedPdf { mut document, path, .. } = loaded;

        document.renumber_objects_with(self.output.max_id + 1);
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        let mut pages = HashMap::new();
        for &page_id in &page_ids {
            if let Ok(page) = document.get_dictionary(page_id) {
                pages.insert(page_id, self.detach_page(&document, page));
            }
        }

        for (object_id, object) in document.objects {
            if let Some(page) = pages.remove(&object_id) {
                self.output.objects.insert(object_id, Object::Dictionary(page));
                continue;
            }
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" => {}
                _ => {
                    self.output.objects.insert(object_id, object);
                }
            }
        }
        self.output.max_id = self.output.max_id.max(document.max_id);

        tracing::debug!(path = %path.display(), pages = page_ids.len(), "imported source");
        let count = page_ids.len();
        self.sources.insert(path, page_ids);
        count
    }

    /// Append page `page_index` (zero-based) of an imported source.
    ///
    /// A page pushed a second time is appended as a copy.
    ///
    /// # Errors
    ///
    /// Returns [`BuckError::ReadError`] if the source was never imported or
    /// no longer has that page.
    pub fn push(&mut self, path: &Path, page_index: usize) -> Result<()> {
        let page_ids = self
            .sources
            .get(path)
            .ok_or_else(|| BuckError::read_error(path, "source was not loaded"))?;
        let page_id = *page_ids.get(page_index).ok_or_else(|| {
            BuckError::read_error(
                path,
                format!(
                    "page {} no longer exists (the file now has {} page(s))",
                    page_index + 1,
                    page_ids.len()
                ),
            )
        })?;

        let id = if self.placed.insert(page_id) {
            page_id
        } else {
            let copy = self.output.get_object(page_id)?.clone();
            self.output.add_object(copy)
        };
        self.kids.push(id);
        Ok(())
    }

    /// Append every page of an imported source, in document order.
    pub fn push_all(&mut self, path: &Path) -> Result<()> {
        let count = self
            .source_page_count(path)
            .ok_or_else(|| BuckError::read_error(path, "source was not loaded"))?;
        for page_index in 0..count {
            self.push(path, page_index)?;
        }
        Ok(())
    }

    /// Close the page tree and return the finished document.
    ///
    /// Objects no page can reach are dropped.
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.kids.len() as i64));
        pages.set("Kids", Object::Array(kids));
        self.output
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.output.add_object(catalog);
        self.output.trailer.set("Root", Object::Reference(catalog_id));

        let pruned = self.output.prune_objects();
        tracing::debug!(
            pages = self.kids.len(),
            pruned = pruned.len(),
            "assembled output document"
        );

        self.output
    }

    fn detach_page(&self, document: &Document, page: &Dictionary) -> Dictionary {
        let mut page = page.clone();
        for &key in INHERITABLE {
            if !page.has(key)
                && let Some(value) = inherited_attribute(document, &page, key)
            {
                page.set(key, value);
            }
        }
        page.set("Parent", Object::Reference(self.pages_id));
        page
    }
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn inherited_attribute(document: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        let node = document.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    None
}
