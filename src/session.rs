//! Session-scoped application state.
//!
//! `MapSession` is the owned state object the embedding UI drives: one
//! loaded document, the edit-mode flag, the current draft marker, and the
//! persistent storage slot. All mutations run synchronously inside event
//! handlers; the only async path is image dimension resolution, which is
//! guarded against stale results by a generation token so a callback from
//! a superseded document can never corrupt a newer one.

use crate::core::bounds::LogicalBounds;
use crate::core::geo::{LogicalCoord, Point};
use crate::core::viewport::Viewport;
use crate::document::model::{DraftMarker, MapDocument, MapInfo, Marker, MarkerId};
use crate::document::{codec, storage};
use crate::image::{DimensionResolver, ImageSource};
use crate::input::events::{ClickEvent, MapEvent};
use crate::input::guard::{PlacementGuard, PlacementRejection};
use crate::markers::search::SearchIndex;
use crate::markers::store::MarkerStore;
use crate::{DocumentStorage, MapError, Result};
use time::OffsetDateTime;

/// A view change the session asks the renderer to perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Jump to a coordinate at a zoom level (search focus)
    SetView { center: LogicalCoord, zoom: f64 },
    /// Recenter on the given bounds (center-map command)
    FitBounds(LogicalBounds),
}

pub struct MapSession {
    map: Option<MapInfo>,
    store: MarkerStore,
    draft: Option<DraftMarker>,
    edit_mode: bool,
    /// Bumped on every document replacement; async results carry the
    /// token they started under and are discarded on mismatch.
    generation: u64,
    storage: Box<dyn DocumentStorage>,
}

impl MapSession {
    /// Opens a session, reading the persisted slot once
    pub fn start(storage: Box<dyn DocumentStorage>) -> Result<Self> {
        let mut session = Self {
            map: None,
            store: MarkerStore::new(),
            draft: None,
            edit_mode: false,
            generation: 0,
            storage,
        };
        let slot = storage::load_slot(session.storage.as_ref())?;
        if let Some(document) = slot {
            session.adopt(document);
        }
        Ok(session)
    }

    /// Whether a document is loaded
    pub fn has_document(&self) -> bool {
        self.map.is_some()
    }

    /// Assembles the current document state
    pub fn document(&self) -> Result<MapDocument> {
        let map = self.map.clone().ok_or(MapError::NoDocument)?;
        Ok(MapDocument {
            map,
            markers: self.store.markers().to_vec(),
        })
    }

    pub fn markers(&self) -> &[Marker] {
        self.store.markers()
    }

    pub fn draft(&self) -> Option<&DraftMarker> {
        self.draft.as_ref()
    }

    /// Mutable access to the open draft for form edits in the panel
    pub fn draft_mut(&mut self) -> Option<&mut DraftMarker> {
        self.draft.as_mut()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    pub fn current_zoom(&self) -> Option<f64> {
        self.map.as_ref().and_then(|m| m.current_zoom)
    }

    // ---- document lifecycle ----

    /// Imports a user-supplied JSON document. A parse failure leaves any
    /// already-loaded document untouched.
    pub fn import(&mut self, json_text: &str) -> Result<()> {
        let document = codec::deserialize(json_text)?;
        self.adopt(document);
        self.persist()
    }

    /// Creates a minimal new document from the create-map form fields
    pub fn create_map(
        &mut self,
        name: impl Into<String>,
        image_url: impl Into<String>,
        default_marker_image_url: impl Into<String>,
    ) -> Result<()> {
        self.adopt(MapDocument::new(name, image_url, default_marker_image_url));
        self.persist()
    }

    fn adopt(&mut self, document: MapDocument) {
        self.generation += 1;
        let MapDocument { mut map, markers } = document;
        if map.current_zoom.is_none() {
            map.current_zoom = Some(Viewport::initial_zoom_for(map.bounds.as_ref()));
        }
        let zoom = map.current_zoom.unwrap_or(0.0);
        self.map = Some(map);
        self.store = MarkerStore::from_markers(markers);
        self.store.apply_visibility(zoom);
        self.draft = None;
    }

    fn persist(&mut self) -> Result<()> {
        let document = self.document()?;
        storage::store_slot(self.storage.as_mut(), &document)
    }

    /// Serializes the document for download, returning the JSON text and
    /// the timestamped filename
    pub fn export(&self, now: OffsetDateTime) -> Result<(String, String)> {
        let document = self.document()?;
        let json = codec::serialize(&document)?;
        let file_name = codec::export_file_name(&document, now);
        log::info!("exported document to {file_name}");
        Ok((json, file_name))
    }

    // ---- event handling ----

    /// Dispatches a renderer event. Rejected clicks are diagnostics, not
    /// errors; they surface through the guard's logging.
    pub fn handle_event(&mut self, event: &MapEvent, viewport: &Viewport) -> Result<()> {
        match event {
            MapEvent::Click(click) => {
                let _ = self.handle_map_click(click, viewport);
                Ok(())
            }
            MapEvent::ZoomEnd { zoom } => self.zoom_changed(*zoom),
        }
    }

    /// Runs a click through the containment guard; an accepted click
    /// opens a fresh draft anchored above the click position
    pub fn handle_map_click(
        &mut self,
        event: &ClickEvent,
        viewport: &Viewport,
    ) -> std::result::Result<&DraftMarker, PlacementRejection> {
        let coord = viewport.container_to_logical(&event.container_point);
        let bounds = self.map.as_ref().and_then(|m| m.bounds.as_ref());
        PlacementGuard::check(self.edit_mode, event.region, bounds, &coord)?;

        // The guard only passes with bounds present, so a map is loaded
        let Some(map) = self.map.as_ref() else {
            return Err(PlacementRejection::MissingBounds);
        };
        let anchor = viewport.click_anchor(&event.container_point, &event.container_origin);
        let draft = DraftMarker::at(
            coord,
            anchor,
            &map.default_marker_image_url,
            map.current_zoom,
        );
        Ok(self.draft.insert(draft))
    }

    /// Opens an existing marker for editing, anchored at the viewport
    /// center since no originating pointer event is available. No-op
    /// outside edit mode.
    pub fn marker_clicked(
        &mut self,
        id: MarkerId,
        window_size: Point,
        scroll: Point,
    ) -> Option<&DraftMarker> {
        if !self.edit_mode {
            return None;
        }
        let anchor = Viewport::view_center_anchor(&window_size, &scroll);
        let draft = self.store.open_for_edit(id, anchor)?;
        Some(self.draft.insert(draft))
    }

    /// Commits the open draft and recomputes visibility at the current
    /// zoom
    pub fn save_draft(&mut self) -> Result<Marker> {
        let draft = self.draft.take().ok_or(MapError::NoDraft)?;
        let marker = self.store.commit(draft);
        if let Some(zoom) = self.current_zoom() {
            self.store.apply_visibility(zoom);
        }
        self.persist()?;
        Ok(marker)
    }

    /// Discards the open draft without committing
    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Deletes the marker behind the open draft (no-op for a draft that
    /// was never committed) and closes the panel
    pub fn delete_draft_marker(&mut self) -> Result<()> {
        if let Some(draft) = self.draft.take() {
            if let Some(id) = draft.id {
                self.store.delete(id);
                self.persist()?;
            }
        }
        Ok(())
    }

    /// Records a settled zoom level and re-evaluates every marker's
    /// visibility from scratch. Idempotent under rapid repeated zoom-end
    /// events.
    pub fn zoom_changed(&mut self, zoom: f64) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NoDocument)?;
        map.current_zoom = Some(zoom);
        self.store.apply_visibility(zoom);
        self.persist()
    }

    // ---- search ----

    /// Case-insensitive substring filter over label and description
    pub fn search(&self, query: &str) -> Vec<&Marker> {
        SearchIndex::new(self.store.markers()).query(query)
    }

    /// View command for a selected search result: the marker's position
    /// at the midpoint of its zoom window, or the current zoom when the
    /// window is unbounded. The caller clears its result list.
    pub fn select_search_result(&self, id: MarkerId) -> Option<ViewCommand> {
        let marker = self.store.get(id)?;
        let zoom = marker
            .focus_zoom()
            .or(self.current_zoom())
            .unwrap_or(crate::constants::INITIAL_ZOOM_FALLBACK);
        Some(ViewCommand::SetView {
            center: marker.position,
            zoom,
        })
    }

    // ---- geometry ----

    /// Center-map command: recomputes bounds from the stored image
    /// dimensions and asks the renderer to fit them. Unavailable until
    /// dimensions are known.
    pub fn center_map(&self) -> Result<ViewCommand> {
        let map = self.map.as_ref().ok_or(MapError::NoDocument)?;
        let (width, height) = match (map.image_width, map.image_height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                log::warn!("center-map unavailable: image dimensions unknown");
                return Err(MapError::MissingDimensions);
            }
        };
        let bounds = LogicalBounds::from_image_size(width, height)
            .ok_or(MapError::MissingDimensions)?;
        Ok(ViewCommand::FitBounds(bounds))
    }

    // ---- async image dimension resolution ----

    /// Resolves the current map image's dimensions and applies them to
    /// the document. If a second import or create replaces the document
    /// while the load is in flight, the stale result is discarded.
    pub async fn resolve_image_dimensions(
        &mut self,
        source: &dyn ImageSource,
        resolver: &DimensionResolver,
    ) -> Result<()> {
        let (token, url) = {
            let map = self.map.as_ref().ok_or(MapError::NoDocument)?;
            (self.generation, map.image_url.clone())
        };

        let dimensions = resolver.resolve(source, &url).await?;
        self.apply_image_dimensions(token, &url, dimensions.width, dimensions.height)
    }

    /// Applies an image-load result, rejecting it when the document has
    /// been replaced or its image URL changed since the load started
    pub fn apply_image_dimensions(
        &mut self,
        token: u64,
        url: &str,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let Some(map) = self.map.as_mut() else {
            return Err(MapError::NoDocument);
        };
        if token != self.generation || map.image_url != url {
            log::warn!("discarding stale image dimensions for {url}");
            return Err(MapError::StaleResult(url.to_string()));
        }

        map.image_width = Some(width);
        map.image_height = Some(height);
        if let Some(bounds) = LogicalBounds::from_image_size(width, height) {
            map.bounds = Some(bounds);
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::storage::MemoryStorage;
    use crate::image::{ImageDimensions, ImageSource};
    use crate::input::events::TargetRegion;
    use async_trait::async_trait;
    use time::macros::datetime;

    const MINIMAL: &str =
        r#"{"map":{"name":"T","imageUrl":"x.png","bounds":[[0,0],[1,1]]},"markers":[]}"#;

    fn session_with_doc() -> MapSession {
        let mut session = MapSession::start(Box::new(MemoryStorage::new())).unwrap();
        session.import(MINIMAL).unwrap();
        session.set_edit_mode(true);
        session
    }

    fn viewport() -> Viewport {
        // Centered on the unit square; the container center projects back
        // to (0.5, 0.5)
        Viewport::new(LogicalCoord::new(0.5, 0.5), 10.0, Point::new(800.0, 600.0))
    }

    fn click_at_center() -> ClickEvent {
        ClickEvent::on_map(Point::new(400.0, 300.0), Point::new(0.0, 60.0))
    }

    #[test]
    fn test_import_scenario_produces_marker_1() {
        let mut session = session_with_doc();
        let vp = viewport();

        let draft = session.handle_map_click(&click_at_center(), &vp).unwrap();
        let pos = draft.position;
        assert!((pos.lat - 0.5).abs() < 1e-9);
        assert!((pos.lng - 0.5).abs() < 1e-9);

        session.save_draft().unwrap();
        let (json, _) = session.export(datetime!(2025-01-01 00:00 UTC)).unwrap();
        let exported = codec::deserialize(&json).unwrap();
        assert_eq!(exported.markers.len(), 1);
        assert_eq!(exported.markers[0].label, "Marker 1");
    }

    #[test]
    fn test_click_rejected_outside_edit_mode_and_on_chrome() {
        let mut session = session_with_doc();
        let vp = viewport();

        session.set_edit_mode(false);
        assert_eq!(
            session.handle_map_click(&click_at_center(), &vp).unwrap_err(),
            PlacementRejection::EditModeOff
        );

        session.set_edit_mode(true);
        let chrome = ClickEvent {
            region: TargetRegion::ReservedChrome,
            ..click_at_center()
        };
        assert_eq!(
            session.handle_map_click(&chrome, &vp).unwrap_err(),
            PlacementRejection::ReservedChrome
        );
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_click_rejected_when_bounds_missing() {
        let mut session = MapSession::start(Box::new(MemoryStorage::new())).unwrap();
        session
            .import(r#"{"map":{"name":"T","imageUrl":"x.png"},"markers":[]}"#)
            .unwrap();
        session.set_edit_mode(true);

        assert_eq!(
            session
                .handle_map_click(&click_at_center(), &viewport())
                .unwrap_err(),
            PlacementRejection::MissingBounds
        );
    }

    #[test]
    fn test_failed_import_leaves_document_untouched() {
        let mut session = session_with_doc();
        assert!(session.import("{broken").is_err());
        assert_eq!(session.document().unwrap().map.name, "T");
    }

    #[test]
    fn test_zoom_change_drives_visibility() {
        let mut session = session_with_doc();
        let vp = viewport();
        let draft = session.handle_map_click(&click_at_center(), &vp).unwrap();
        // Draft window seeded to the current zoom (8 after import) +/- 2
        assert_eq!(draft.min_zoom, Some(6));

        session.save_draft().unwrap();
        let window = (
            session.markers()[0].min_zoom.unwrap(),
            session.markers()[0].max_zoom.unwrap(),
        );

        session.zoom_changed((window.1 + 1) as f64).unwrap();
        assert!(!session.markers()[0].visible);

        session.zoom_changed(window.0 as f64).unwrap();
        assert!(session.markers()[0].visible);
    }

    #[test]
    fn test_handle_event_dispatches_zoom_end() {
        let mut session = session_with_doc();
        session
            .handle_event(&MapEvent::ZoomEnd { zoom: 12.0 }, &viewport())
            .unwrap();
        assert_eq!(session.current_zoom(), Some(12.0));
    }

    #[test]
    fn test_edit_and_delete_via_draft() {
        let mut session = session_with_doc();
        let vp = viewport();
        session.handle_map_click(&click_at_center(), &vp).unwrap();
        let marker = session.save_draft().unwrap();

        let draft = session
            .marker_clicked(marker.id, Point::new(1920.0, 1080.0), Point::default())
            .unwrap();
        assert_eq!(draft.id, Some(marker.id));
        // Anchor falls back to the viewport center
        assert_eq!(draft.click_position.x, 960.0);

        session.delete_draft_marker().unwrap();
        assert!(session.markers().is_empty());
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_marker_clicked_gated_by_edit_mode() {
        let mut session = session_with_doc();
        let vp = viewport();
        session.handle_map_click(&click_at_center(), &vp).unwrap();
        let marker = session.save_draft().unwrap();

        session.set_edit_mode(false);
        assert!(session
            .marker_clicked(marker.id, Point::new(800.0, 600.0), Point::default())
            .is_none());
    }

    #[test]
    fn test_search_and_focus() {
        let mut session = session_with_doc();
        let vp = viewport();
        session.handle_map_click(&click_at_center(), &vp).unwrap();
        let mut draft = session.draft().unwrap().clone();
        draft.description = "Mountain Lake overlook".into();
        session.draft = Some(draft);
        let marker = session.save_draft().unwrap();

        assert_eq!(session.search("lake").len(), 1);
        assert!(session.search("").is_empty());

        let command = session.select_search_result(marker.id).unwrap();
        match command {
            ViewCommand::SetView { center, zoom } => {
                assert_eq!(center, marker.position);
                // Midpoint of the seeded window 6..10
                assert_eq!(zoom, 8.0);
            }
            _ => panic!("expected SetView"),
        }
    }

    #[test]
    fn test_center_map_requires_dimensions() {
        let session = session_with_doc();
        assert!(matches!(
            session.center_map(),
            Err(MapError::MissingDimensions)
        ));
    }

    #[test]
    fn test_apply_dimensions_updates_bounds() {
        let mut session = session_with_doc();
        let token = session.generation;
        session
            .apply_image_dimensions(token, "x.png", 4096, 2048)
            .unwrap();

        let doc = session.document().unwrap();
        assert_eq!(doc.map.image_width, Some(4096));
        assert_eq!(
            doc.map.bounds,
            Some(LogicalBounds::from_coords(0.0, 0.0, 4.0, 8.0))
        );

        match session.center_map().unwrap() {
            ViewCommand::FitBounds(bounds) => {
                assert_eq!(bounds.max.lng, 8.0);
            }
            _ => panic!("expected FitBounds"),
        }
    }

    #[test]
    fn test_stale_dimension_result_is_discarded() {
        let mut session = session_with_doc();
        let stale_token = session.generation;

        // A second import supersedes the in-flight load
        session
            .import(r#"{"map":{"name":"U","imageUrl":"y.png","bounds":[[0,0],[1,1]]},"markers":[]}"#)
            .unwrap();

        assert!(matches!(
            session.apply_image_dimensions(stale_token, "x.png", 4096, 2048),
            Err(MapError::StaleResult(_))
        ));
        let doc = session.document().unwrap();
        assert_eq!(doc.map.image_width, None);
        assert_eq!(doc.map.bounds, Some(LogicalBounds::unit()));
    }

    #[test]
    fn test_session_restores_persisted_slot() {
        let mut storage = MemoryStorage::new();
        {
            let mut session = MapSession::start(Box::new(MemoryStorage::new())).unwrap();
            session.import(MINIMAL).unwrap();
            let doc = session.document().unwrap();
            crate::document::storage::store_slot(&mut storage, &doc).unwrap();
        }

        let restored = MapSession::start(Box::new(storage)).unwrap();
        assert!(restored.has_document());
        assert_eq!(restored.document().unwrap().map.name, "T");
        // Initial zoom was derived on first import and round-tripped
        assert_eq!(restored.current_zoom(), Some(8.0));
    }

    struct FixedSource(ImageDimensions);

    #[async_trait]
    impl ImageSource for FixedSource {
        async fn dimensions(&self, _url: &str) -> crate::Result<ImageDimensions> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_resolve_image_dimensions_end_to_end() {
        let mut session = session_with_doc();
        let source = FixedSource(ImageDimensions::new(1920, 1080));
        session
            .resolve_image_dimensions(&source, &DimensionResolver::new())
            .await
            .unwrap();

        let doc = session.document().unwrap();
        assert_eq!(doc.map.image_height, Some(1080));
        assert!(doc.map.bounds.unwrap().max_extent() <= 10.0);
    }
}
