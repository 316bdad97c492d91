//! The owned session object: registry, source store, selection, and zoom.
//!
//! Everything the interactive surface mutates lives here, with an explicit
//! lifecycle (`new`/`clear`), and is passed by reference into ingestion and
//! merge routines. Selection and zoom are transient presentation state:
//! they never affect registry order or export output.

use std::collections::{HashMap, HashSet};

use crate::registry::{Page, PageDraft, PageId, Registry, SourceId};

/// Zoom step applied per zoom-in/zoom-out action, in percent.
pub const ZOOM_STEP: u32 = 25;
/// Minimum zoom level in percent.
pub const MIN_ZOOM: u32 = 50;
/// Maximum zoom level in percent.
pub const MAX_ZOOM: u32 = 200;
/// Base thumbnail cell width in pixels at 100% zoom.
const BASE_CELL_WIDTH: u32 = 180;

/// An ingested source document retained for export.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Display name of the uploaded file.
    pub name: String,
    /// The original file bytes, reparsed once at export time.
    pub bytes: Vec<u8>,
}

/// Thumbnail grid zoom level.
///
/// Only affects layout density; page data is never touched by zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevel {
    percent: u32,
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self { percent: 100 }
    }
}

impl ZoomLevel {
    /// Current zoom percentage.
    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// Step in, clamped at [`MAX_ZOOM`]. Returns true if the level changed.
    pub fn zoom_in(&mut self) -> bool {
        if self.percent < MAX_ZOOM {
            self.percent += ZOOM_STEP;
            true
        } else {
            false
        }
    }

    /// Step out, clamped at [`MIN_ZOOM`]. Returns true if the level changed.
    pub fn zoom_out(&mut self) -> bool {
        if self.percent > MIN_ZOOM {
            self.percent -= ZOOM_STEP;
            true
        } else {
            false
        }
    }

    /// Minimum grid cell width in pixels at this zoom level.
    pub fn grid_min_width(&self) -> u32 {
        (BASE_CELL_WIDTH as f64 * self.percent as f64 / 100.0).round() as u32
    }
}

/// One editing session: the page registry plus everything around it.
#[derive(Debug, Default)]
pub struct Session {
    registry: Registry,
    sources: HashMap<SourceId, SourceFile>,
    next_source_id: u64,
    selection: HashSet<PageId>,
    zoom: ZoomLevel,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Store an ingested source document and return its opaque id.
    pub fn register_source(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> SourceId {
        let id = SourceId(self.next_source_id);
        self.next_source_id += 1;
        self.sources.insert(
            id,
            SourceFile {
                name: name.into(),
                bytes,
            },
        );
        id
    }

    /// Look up a stored source document.
    pub fn source(&self, id: SourceId) -> Option<&SourceFile> {
        self.sources.get(&id)
    }

    /// Append a page produced by ingestion.
    pub fn append_page(&mut self, draft: PageDraft) -> PageId {
        self.registry.append(draft)
    }

    /// Translate a completed drag into a registry move.
    ///
    /// The reorder widget reports `(old_index, new_index)` after the drop;
    /// these map directly onto the registry's splice semantics.
    pub fn apply_drag(&mut self, old_index: usize, new_index: usize) {
        self.registry.move_page(old_index, new_index);
    }

    /// Delete one page. Stale ids are a no-op.
    pub fn delete_page(&mut self, id: PageId) -> bool {
        self.selection.remove(&id);
        self.registry.remove_by_id(id)
    }

    /// Toggle whether a page is selected. Unknown ids are ignored.
    pub fn toggle_selected(&mut self, id: PageId) {
        if self.registry.get(id).is_none() {
            return;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Select every page, or clear the selection if everything is already
    /// selected.
    pub fn toggle_select_all(&mut self) {
        if !self.registry.is_empty() && self.selection.len() == self.registry.len() {
            self.selection.clear();
        } else {
            self.selection = self.registry.ids().into_iter().collect();
        }
    }

    /// Whether a page is currently selected.
    pub fn is_selected(&self, id: PageId) -> bool {
        self.selection.contains(&id)
    }

    /// Number of currently selected pages.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Delete all selected pages in one pass and clear the selection.
    ///
    /// Returns how many pages were removed.
    pub fn delete_selected(&mut self) -> usize {
        let removed = self.registry.remove_by_ids(&self.selection);
        self.selection.clear();
        removed
    }

    /// Drop all pages, sources, and selection, and reset id assignment.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.sources.clear();
        self.next_source_id = 0;
        self.selection.clear();
    }

    /// Current ordered page sequence (see [`Registry::snapshot`]).
    pub fn snapshot(&self) -> &[Page] {
        self.registry.snapshot()
    }

    /// The zoom level, immutable.
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// The zoom level, for stepping in or out.
    pub fn zoom_mut(&mut self) -> &mut ZoomLevel {
        &mut self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PageKind;
    use crate::render::Thumbnail;

    fn image_draft(name: &str) -> PageDraft {
        PageDraft {
            kind: PageKind::Image,
            source_name: name.to_string(),
            thumbnail: Thumbnail::blank(10, 10),
            original_ordinal: 1,
        }
    }

    #[test]
    fn test_register_source_assigns_distinct_ids() {
        let mut session = Session::new();
        let a = session.register_source("a.pdf", vec![1]);
        let b = session.register_source("b.pdf", vec![2]);
        assert_ne!(a, b);
        assert_eq!(session.source(a).unwrap().name, "a.pdf");
        assert_eq!(session.source(b).unwrap().bytes, vec![2]);
    }

    #[test]
    fn test_apply_drag_translates_to_move() {
        let mut session = Session::new();
        let a = session.append_page(image_draft("a"));
        let b = session.append_page(image_draft("b"));
        let c = session.append_page(image_draft("c"));

        session.apply_drag(2, 0);
        let ids: Vec<_> = session.snapshot().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[test]
    fn test_toggle_selected_ignores_unknown_ids() {
        let mut session = Session::new();
        session.toggle_selected(42);
        assert_eq!(session.selected_count(), 0);

        let a = session.append_page(image_draft("a"));
        session.toggle_selected(a);
        assert!(session.is_selected(a));
        session.toggle_selected(a);
        assert!(!session.is_selected(a));
    }

    #[test]
    fn test_toggle_select_all_round_trip() {
        let mut session = Session::new();
        session.append_page(image_draft("a"));
        session.append_page(image_draft("b"));

        session.toggle_select_all();
        assert_eq!(session.selected_count(), 2);

        // Everything selected: a second toggle clears.
        session.toggle_select_all();
        assert_eq!(session.selected_count(), 0);
    }

    #[test]
    fn test_toggle_select_all_with_partial_selection_selects_everything() {
        let mut session = Session::new();
        let a = session.append_page(image_draft("a"));
        session.append_page(image_draft("b"));

        session.toggle_selected(a);
        session.toggle_select_all();
        assert_eq!(session.selected_count(), 2);
    }

    #[test]
    fn test_delete_selected() {
        let mut session = Session::new();
        let a = session.append_page(image_draft("a"));
        let b = session.append_page(image_draft("b"));
        let c = session.append_page(image_draft("c"));

        session.toggle_selected(a);
        session.toggle_selected(c);
        assert_eq!(session.delete_selected(), 2);
        assert_eq!(session.selected_count(), 0);

        let ids: Vec<_> = session.snapshot().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_delete_page_also_deselects() {
        let mut session = Session::new();
        let a = session.append_page(image_draft("a"));
        session.toggle_selected(a);

        assert!(session.delete_page(a));
        assert_eq!(session.selected_count(), 0);
        assert!(!session.delete_page(a)); // Stale id: no-op
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        session.register_source("a.pdf", vec![1, 2, 3]);
        session.append_page(image_draft("a"));
        session.toggle_select_all();

        session.clear();
        assert!(session.snapshot().is_empty());
        assert_eq!(session.selected_count(), 0);

        // Both counters restart after an explicit clear.
        let id = session.append_page(image_draft("b"));
        assert_eq!(id, 0);
        let src = session.register_source("b.pdf", vec![4]);
        assert_eq!(src, SourceId(0));
    }

    #[test]
    fn test_zoom_clamping() {
        let mut zoom = ZoomLevel::default();
        assert_eq!(zoom.percent(), 100);

        while zoom.zoom_in() {}
        assert_eq!(zoom.percent(), MAX_ZOOM);
        assert!(!zoom.zoom_in());

        while zoom.zoom_out() {}
        assert_eq!(zoom.percent(), MIN_ZOOM);
        assert!(!zoom.zoom_out());
    }

    #[test]
    fn test_zoom_grid_width() {
        let mut zoom = ZoomLevel::default();
        assert_eq!(zoom.grid_min_width(), 180);
        zoom.zoom_out();
        zoom.zoom_out();
        assert_eq!(zoom.grid_min_width(), 90);
    }
}
