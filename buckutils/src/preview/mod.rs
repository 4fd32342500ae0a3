//! Page previews: a short text snippet and an optional PNG thumbnail.
//!
//! Rendering never fails. A page whose text cannot be extracted gets
//! [`NO_TEXT_PLACEHOLDER`], and a page Ghostscript cannot render simply has
//! no image. Previews are produced off the owner's thread by a
//! [`PreviewQueue`] and handed back as [`PreviewEvent`]s.

pub mod ghostscript;
pub mod queue;

use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::PreviewOptions;

pub use ghostscript::Ghostscript;
pub use queue::{PreviewEvent, PreviewQueue};

/// Shown when a page has no extractable text.
pub const NO_TEXT_PLACEHOLDER: &str = "No text preview available for this page.";

/// Identifies one page of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewKey {
    /// Source file.
    pub path: PathBuf,
    /// Zero-based page index.
    pub page_index: usize,
}

impl PreviewKey {
    /// Create a key for page `page_index` of `path`.
    pub fn new(path: impl Into<PathBuf>, page_index: usize) -> Self {
        Self {
            path: path.into(),
            page_index,
        }
    }
}

/// A page waiting to be previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    /// Page to render.
    pub key: PreviewKey,
    /// Label shown next to the preview.
    pub label: String,
}

/// The finished preview of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePreview {
    /// Page this preview belongs to.
    pub key: PreviewKey,
    /// Label shown next to the preview.
    pub label: String,
    /// Whitespace-collapsed text snippet.
    pub text: String,
    /// Thumbnail, if one could be rendered.
    pub image: Option<PathBuf>,
}

/// Collapse whitespace and cut `raw` down to `limit` characters.
///
/// # Examples
///
/// ```
/// use buckutils::preview::summarize_text;
///
/// assert_eq!(summarize_text("  Quarterly\n\n report ", 240), "Quarterly report");
/// assert_eq!(summarize_text("abcdef", 3), "abc…");
/// ```
pub fn summarize_text(raw: &str, limit: usize) -> String {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return NO_TEXT_PLACEHOLDER.to_string();
    }
    if cleaned.chars().count() > limit {
        let mut cut: String = cleaned.chars().take(limit).collect();
        cut.push('…');
        cut
    } else {
        cleaned
    }
}

/// Produces [`PagePreview`]s. Cheap to clone into worker tasks.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    options: PreviewOptions,
    ghostscript: Option<Ghostscript>,
}

impl PreviewRenderer {
    /// Create a renderer, locating Ghostscript if images are enabled.
    pub fn new(options: PreviewOptions) -> Self {
        let ghostscript = if options.render_images {
            options
                .ghostscript
                .clone()
                .map(Ghostscript::from_path)
                .or_else(Ghostscript::locate)
        } else {
            None
        };
        Self {
            options,
            ghostscript,
        }
    }

    /// Create a renderer that only extracts text.
    pub fn text_only() -> Self {
        Self::new(PreviewOptions {
            render_images: false,
            ..Default::default()
        })
    }

    /// Options in effect.
    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    /// Whether thumbnails will be attempted.
    pub fn renders_images(&self) -> bool {
        self.ghostscript.is_some()
    }

    /// Build the preview for one page.
    pub fn render(&self, request: &PreviewRequest) -> PagePreview {
        let key = &request.key;
        let text = summarize_text(&extract_page_text(key), self.options.text_limit);

        let image = self.ghostscript.as_ref().and_then(|gs| {
            gs.render_page(
                &key.path,
                key.page_index,
                &self.options.thumbnail_dir(),
                self.options.resolution,
            )
            .map_err(|err| {
                tracing::warn!(
                    path = %key.path.display(),
                    page = key.page_index + 1,
                    error = %err,
                    "thumbnail rendering failed"
                );
            })
            .ok()
        });

        PagePreview {
            key: key.clone(),
            label: request.label.clone(),
            text,
            image,
        }
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(PreviewOptions::default())
    }
}

fn extract_page_text(key: &PreviewKey) -> String {
    let page_number = key.page_index as u32 + 1;
    load_document(&key.path)
        .and_then(|doc| doc.extract_text(&[page_number]).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            tracing::warn!(
                path = %key.path.display(),
                page = page_number,
                error = %err,
                "text extraction failed"
            );
            String::new()
        })
}

fn load_document(path: &Path) -> std::result::Result<Document, String> {
    Document::load(path).map_err(|e| e.to_string())
}
