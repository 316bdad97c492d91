//! The page registry: the ordered collection of page records.
//!
//! Registry order is the sole source of truth for output order. Every
//! mutation is a single-pass transformation, so there is never a partially
//! applied reorder or delete to roll back. Ids are assigned monotonically
//! and never reused; only [`Registry::clear`] resets the counter.

use serde::Serialize;
use std::collections::HashSet;

use crate::render::Thumbnail;

/// Identifier of a page record, unique for the registry's lifetime.
pub type PageId = u64;

/// Opaque identifier of an ingested source document.
///
/// Assigned by the session when a PDF is ingested and used as the grouping
/// key at export time, so grouping never depends on byte-buffer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceId(pub(crate) u64);

/// What a page record is backed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// One page of an ingested PDF document.
    Document {
        /// The source document this page was copied from.
        source: SourceId,
        /// Zero-based page index within the source.
        page_index: usize,
    },
    /// A standalone image; the stored thumbnail is the re-encodable pixel
    /// source at export time.
    Image,
}

impl PageKind {
    /// The source document id, if this is a document page.
    pub fn source(&self) -> Option<SourceId> {
        match self {
            Self::Document { source, .. } => Some(*source),
            Self::Image => None,
        }
    }
}

/// One visual unit that will become one output page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Unique, stable identifier. Never reused, even after deletion.
    pub id: PageId,
    /// Backing of this page (document page or standalone image).
    pub kind: PageKind,
    /// Display name of the originating file.
    pub source_name: String,
    /// Rendered raster representation.
    pub thumbnail: Thumbnail,
    /// 1-based page number within the source document, fixed at ingestion.
    /// Always 1 for images. Used for display only; reordering never
    /// changes it.
    pub original_ordinal: usize,
}

/// A page record before it has been assigned an id.
///
/// Built by the ingestion pipeline; the registry stamps the id on append.
#[derive(Debug, Clone)]
pub struct PageDraft {
    /// Backing of this page.
    pub kind: PageKind,
    /// Display name of the originating file.
    pub source_name: String,
    /// Rendered raster representation.
    pub thumbnail: Thumbnail,
    /// 1-based page number within the source document.
    pub original_ordinal: usize,
}

/// Ordered collection of pages plus id-assignment state.
#[derive(Debug, Default)]
pub struct Registry {
    pages: Vec<Page>,
    next_id: PageId,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page draft at the end, assigning the next id.
    ///
    /// Returns the assigned id.
    pub fn append(&mut self, draft: PageDraft) -> PageId {
        let id = self.next_id;
        self.next_id += 1;
        self.pages.push(Page {
            id,
            kind: draft.kind,
            source_name: draft.source_name,
            thumbnail: draft.thumbnail,
            original_ordinal: draft.original_ordinal,
        });
        id
    }

    /// Move the page at `from` so it ends up at `to`.
    ///
    /// Splice semantics: the element is removed first, then reinserted, so
    /// `to` is interpreted against the list with the element already taken
    /// out (exactly what a drag-reorder widget reports). Relative order of
    /// all other pages is preserved. An out-of-range `from` is a no-op;
    /// `to` is clamped.
    pub fn move_page(&mut self, from: usize, to: usize) {
        if from >= self.pages.len() {
            return;
        }
        let page = self.pages.remove(from);
        let to = to.min(self.pages.len());
        self.pages.insert(to, page);
    }

    /// Remove the page with the given id.
    ///
    /// Returns true if a page was removed. A stale or unknown id is a
    /// no-op, not an error, so repeated deletes are idempotent.
    pub fn remove_by_id(&mut self, id: PageId) -> bool {
        let before = self.pages.len();
        self.pages.retain(|p| p.id != id);
        self.pages.len() != before
    }

    /// Remove all pages whose ids are in `ids`, in one pass.
    ///
    /// Surviving pages keep their relative order. Returns how many pages
    /// were removed.
    pub fn remove_by_ids(&mut self, ids: &HashSet<PageId>) -> usize {
        let before = self.pages.len();
        self.pages.retain(|p| !ids.contains(&p.id));
        before - self.pages.len()
    }

    /// Empty the registry and reset the id counter to its initial value.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.next_id = 0;
    }

    /// The current ordered sequence of pages.
    ///
    /// Always reflects the latest mutation; both the renderer and the merge
    /// engine read through this.
    pub fn snapshot(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by id.
    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Number of pages currently held.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the registry holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Ids of all pages in current order.
    pub fn ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|p| p.id).collect()
    }
}
