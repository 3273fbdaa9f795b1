use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Where in the page a pointer event originated.
///
/// The renderer reports the DOM target chain of each click; anything under
/// the header/toolbar overlays counts as reserved chrome and never places
/// a marker, whatever coordinate it projects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRegion {
    /// The map surface itself
    MapSurface,
    /// Header, toolbar, or other UI overlay regions
    ReservedChrome,
}

/// A pointer click relayed by the embedding renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Click position relative to the map container
    pub container_point: Point,
    /// Page offset of the map container's bounding box
    pub container_origin: Point,
    /// Which region of the page the event targeted
    pub region: TargetRegion,
}

impl ClickEvent {
    pub fn on_map(container_point: Point, container_origin: Point) -> Self {
        Self {
            container_point,
            container_origin,
            region: TargetRegion::MapSurface,
        }
    }

    pub fn on_chrome(container_point: Point, container_origin: Point) -> Self {
        Self {
            container_point,
            container_origin,
            region: TargetRegion::ReservedChrome,
        }
    }

    pub fn is_on_chrome(&self) -> bool {
        self.region == TargetRegion::ReservedChrome
    }
}

/// Events the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Pointer click on the page
    Click(ClickEvent),
    /// Zoom gesture settled at a new level
    ZoomEnd { zoom: f64 },
}
