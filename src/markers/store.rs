//! The authoritative marker collection.
//!
//! The store owns the ordered marker sequence and the id counter. Every
//! mutation replaces the sequence with a freshly built one instead of
//! editing in place; callers holding a slice from before a mutation see
//! the old sequence, which keeps re-rendering predictable in a
//! single-threaded event loop.

use crate::core::constants::FALLBACK_ICON_URL;
use crate::document::model::{DraftMarker, Marker, MarkerId, ScreenAnchor};
use crate::markers::visibility;

#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            next_id: 1,
        }
    }

    /// Adopts an imported marker sequence, seeding the id counter above
    /// the largest id present so imported ids never collide with new ones
    pub fn from_markers(markers: Vec<Marker>) -> Self {
        let next_id = markers.iter().map(|m| m.id.0).max().map_or(1, |id| id + 1);
        Self { markers, next_id }
    }

    /// The current ordered sequence (insertion order = creation order)
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Hands the sequence back, consuming the store
    pub fn into_markers(self) -> Vec<Marker> {
        self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Commits a draft: backfills an empty label with `"Marker {n}"`
    /// (n = 1-indexed post-insert count) and an empty icon URL with the
    /// hardcoded fallback, then appends -- or, when the draft carries the
    /// id of an existing marker, replaces it in place (first match).
    pub fn commit(&mut self, draft: DraftMarker) -> Marker {
        let label = if draft.label.is_empty() {
            format!("Marker {}", self.markers.len() + 1)
        } else {
            draft.label.clone()
        };
        let mut icon = draft.icon.clone();
        if icon.image_url.is_empty() {
            icon.image_url = FALLBACK_ICON_URL.to_string();
        }

        let existing = draft.id.filter(|id| self.get(*id).is_some());
        let id = existing.unwrap_or_else(|| self.allocate_id());
        let marker = Marker {
            id,
            position: draft.position,
            label,
            description: draft.description,
            icon,
            min_zoom: draft.min_zoom,
            max_zoom: draft.max_zoom,
            visible: true,
        };

        self.markers = match existing {
            Some(id) => self
                .markers
                .iter()
                .map(|m| if m.id == id { marker.clone() } else { m.clone() })
                .collect(),
            None => {
                let mut next: Vec<Marker> = self.markers.clone();
                next.push(marker.clone());
                next
            }
        };
        marker
    }

    /// Clones a marker into draft form for editing, anchored wherever the
    /// caller wants the edit panel (usually the viewport center)
    pub fn open_for_edit(&self, id: MarkerId, anchor: ScreenAnchor) -> Option<DraftMarker> {
        self.get(id).map(|m| DraftMarker::from_marker(m, anchor))
    }

    /// Removes a marker by id; no-op if absent
    pub fn delete(&mut self, id: MarkerId) {
        self.markers = self
            .markers
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect();
    }

    /// Recomputes every marker's visibility for the given zoom level,
    /// replacing the sequence
    pub fn apply_visibility(&mut self, zoom: f64) {
        self.markers = visibility::evaluate(&self.markers, zoom);
    }

    fn allocate_id(&mut self) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        id
    }
}
