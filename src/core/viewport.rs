use crate::core::bounds::LogicalBounds;
use crate::core::constants::{
    INITIAL_ZOOM_FALLBACK, INITIAL_ZOOM_MAX, INITIAL_ZOOM_MIN, PANEL_ANCHOR_OFFSET_Y,
};
use crate::core::geo::{LogicalCoord, Point};
use crate::document::model::ScreenAnchor;
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// Projection follows Leaflet's CRS.Simple: logical units scale by `2^zoom`
/// into pixel space with the vertical axis flipped, no geographic math
/// involved. The embedding renderer drives pan/zoom; this type owns the
/// coordinate conversions both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in logical coordinates
    pub center: LogicalCoord,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LogicalCoord, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Creates a viewport centered on the given bounds at the derived
    /// initial zoom.
    pub fn for_bounds(bounds: Option<&LogicalBounds>, size: Point) -> Self {
        let center = bounds.map(|b| b.center()).unwrap_or(LogicalCoord::new(0.5, 0.5));
        Self::new(center, Self::initial_zoom_for(bounds), size)
    }

    /// Initial zoom heuristic: `log2` of the larger bounds extent, clamped
    /// to `[8, 16]`; a fixed fallback when bounds are unavailable.
    pub fn initial_zoom_for(bounds: Option<&LogicalBounds>) -> f64 {
        match bounds {
            Some(b) if b.is_valid() && b.max_extent() > 0.0 => b
                .max_extent()
                .log2()
                .floor()
                .clamp(INITIAL_ZOOM_MIN, INITIAL_ZOOM_MAX),
            _ => INITIAL_ZOOM_FALLBACK,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LogicalCoord) {
        self.center = center;
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a logical coordinate to world pixel coordinates at the
    /// given zoom level (CRS.Simple: x = lng * 2^z, y = -lat * 2^z)
    pub fn project(&self, coord: &LogicalCoord, zoom: Option<f64>) -> Point {
        let scale = 2_f64.powf(zoom.unwrap_or(self.zoom));
        Point::new(coord.lng * scale, -coord.lat * scale)
    }

    /// Unprojects world pixel coordinates back to a logical coordinate
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LogicalCoord {
        let scale = 2_f64.powf(zoom.unwrap_or(self.zoom));
        LogicalCoord::new(-pixel.y / scale, pixel.x / scale)
    }

    /// Converts a logical coordinate to container-relative pixel coordinates
    pub fn logical_to_container(&self, coord: &LogicalCoord) -> Point {
        let world = self.project(coord, None);
        let origin = self.project(&self.center, None);
        world
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts container-relative pixel coordinates back to a logical
    /// coordinate. This is the projection the click path runs through.
    pub fn container_to_logical(&self, point: &Point) -> LogicalCoord {
        let origin = self.project(&self.center, None);
        let world = point
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&origin);
        self.unproject(&world, None)
    }

    /// Computes the absolute page anchor for the floating edit panel from
    /// a container-relative click point and the container's page offset.
    /// The fixed vertical offset lifts the panel above the click.
    pub fn click_anchor(&self, container_point: &Point, container_origin: &Point) -> ScreenAnchor {
        ScreenAnchor {
            x: container_point.x + container_origin.x,
            y: container_point.y + container_origin.y - PANEL_ANCHOR_OFFSET_Y,
        }
    }

    /// Fallback panel anchor when no originating pointer event exists:
    /// the center of the current window, adjusted for scroll, with the
    /// same vertical offset applied.
    pub fn view_center_anchor(window_size: &Point, scroll: &Point) -> ScreenAnchor {
        ScreenAnchor {
            x: window_size.x / 2.0 + scroll.x,
            y: window_size.y / 2.0 + scroll.y - PANEL_ANCHOR_OFFSET_Y,
        }
    }

    /// Gets the current viewport extent in logical coordinates
    pub fn visible_bounds(&self) -> LogicalBounds {
        let top_left = self.container_to_logical(&Point::new(0.0, 0.0));
        let bottom_right = self.container_to_logical(&Point::new(self.size.x, self.size.y));
        LogicalBounds::new(
            LogicalCoord::new(bottom_right.lat, top_left.lng),
            LogicalCoord::new(top_left.lat, bottom_right.lng),
        )
    }

    /// Recenters the viewport on the given bounds at the largest integer
    /// zoom where they still fit inside the viewport
    pub fn fit_bounds(&mut self, bounds: &LogicalBounds) {
        self.center = bounds.center();

        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom as i32)..=(self.max_zoom as i32) {
            let zoom = test_zoom as f64;
            let min_px = self.project(&bounds.min, Some(zoom));
            let max_px = self.project(&bounds.max, Some(zoom));

            let width = (max_px.x - min_px.x).abs();
            let height = (max_px.y - min_px.y).abs();

            if width <= self.size.x && height <= self.size.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        self.set_zoom(best_zoom);
    }

    /// Jumps the view to a coordinate at a specific zoom (search focus)
    pub fn set_view(&mut self, center: LogicalCoord, zoom: f64) {
        self.set_center(center);
        self.set_zoom(zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LogicalCoord::new(0.5, 0.5), 10.0, Point::new(800.0, 600.0))
    }
}
