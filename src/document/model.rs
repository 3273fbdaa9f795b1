use crate::core::bounds::LogicalBounds;
use crate::core::constants::{DEFAULT_ICON_SIZE, DRAFT_ZOOM_WINDOW_HALF_WIDTH};
use crate::core::geo::LogicalCoord;
use serde::{Deserialize, Serialize};

/// Unique marker identifier.
///
/// Ids are handed out by the marker store from a monotonic counter seeded
/// above anything found in an imported document, so timestamp-shaped ids
/// from older exports stay valid while new ids can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

/// Marker icon: an image URL plus a pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_icon_size")]
    pub size: [u32; 2],
}

fn default_icon_size() -> [u32; 2] {
    [DEFAULT_ICON_SIZE.0, DEFAULT_ICON_SIZE.1]
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            size: default_icon_size(),
        }
    }
}

impl MarkerIcon {
    pub fn with_url(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Self::default()
        }
    }
}

/// A committed map annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: MarkerId,
    pub position: LogicalCoord,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: MarkerIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<i32>,
    /// Derived by the zoom-visibility evaluator; never persisted.
    #[serde(skip, default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Marker {
    /// Midpoint of the zoom-visibility window, used as the search focus
    /// zoom. `None` when either side is unbounded.
    pub fn focus_zoom(&self) -> Option<f64> {
        match (self.min_zoom, self.max_zoom) {
            (Some(min), Some(max)) => Some(((min + max) as f64 / 2.0).floor()),
            _ => None,
        }
    }
}

/// Absolute page position anchoring the floating edit panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenAnchor {
    pub x: f64,
    pub y: f64,
}

/// An in-progress, uncommitted marker being created or edited.
///
/// Exists only while the edit panel is open; the screen anchor positions
/// that panel and is discarded with the draft on save or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftMarker {
    /// `Some` when editing an existing marker, `None` for a new one
    /// (the store assigns the id at commit).
    pub id: Option<MarkerId>,
    pub position: LogicalCoord,
    pub label: String,
    pub description: String,
    pub icon: MarkerIcon,
    pub min_zoom: Option<i32>,
    pub max_zoom: Option<i32>,
    pub click_position: ScreenAnchor,
}

impl DraftMarker {
    /// Seeds a fresh draft at a click position. The zoom window defaults
    /// to the current zoom +/- 2 when a zoom is known.
    pub fn at(
        position: LogicalCoord,
        click_position: ScreenAnchor,
        default_icon_url: &str,
        current_zoom: Option<f64>,
    ) -> Self {
        let zoom = current_zoom.map(|z| z.floor() as i32);
        Self {
            id: None,
            position,
            label: String::new(),
            description: String::new(),
            icon: MarkerIcon::with_url(default_icon_url),
            min_zoom: zoom.map(|z| z - DRAFT_ZOOM_WINDOW_HALF_WIDTH),
            max_zoom: zoom.map(|z| z + DRAFT_ZOOM_WINDOW_HALF_WIDTH),
            click_position,
        }
    }

    /// Clones an existing marker into draft form for editing
    pub fn from_marker(marker: &Marker, click_position: ScreenAnchor) -> Self {
        Self {
            id: Some(marker.id),
            position: marker.position,
            label: marker.label.clone(),
            description: marker.description.clone(),
            icon: marker.icon.clone(),
            min_zoom: marker.min_zoom,
            max_zoom: marker.max_zoom,
            click_position,
        }
    }
}

/// Map-level metadata and derived geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub default_marker_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LogicalBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_zoom: Option<f64>,
}

/// The root document: one map plus its ordered marker sequence.
///
/// Marker order is insertion order; default-label numbering and search
/// result order both depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub map: MapInfo,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl MapDocument {
    /// A minimal new document as produced by the create-map form
    pub fn new(name: impl Into<String>, image_url: impl Into<String>, default_marker_image_url: impl Into<String>) -> Self {
        Self {
            map: MapInfo {
                name: name.into(),
                image_url: image_url.into(),
                default_marker_image_url: default_marker_image_url.into(),
                image_width: None,
                image_height: None,
                bounds: Some(LogicalBounds::unit()),
                current_zoom: None,
            },
            markers: Vec::new(),
        }
    }

    /// Current bounds, or the unit-square fallback for rendering paths.
    /// Containment checks must NOT use this; they go through
    /// [`MapInfo::bounds`] directly so a missing value rejects instead of
    /// silently passing.
    pub fn bounds_or_unit(&self) -> LogicalBounds {
        self.map.bounds.unwrap_or_else(LogicalBounds::unit)
    }

    /// Largest marker id present, for seeding the store's id counter
    pub fn max_marker_id(&self) -> Option<MarkerId> {
        self.markers.iter().map(|m| m.id).max()
    }
}
