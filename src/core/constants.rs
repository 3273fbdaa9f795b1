//! Core constants derived from the annotation tool's defaults and common
//! web-map conventions. Keeping them in a single place makes it easier to
//! tweak engine-wide magic numbers.

/// Largest extent (in logical units) of either bounds axis after
/// normalization. Image dimensions are halved until both fit under this.
pub const MAX_LOGICAL_EXTENT: f64 = 10.0;

/// Default marker icon size in pixels.
pub const DEFAULT_ICON_SIZE: (u32, u32) = (40, 40);

/// Icon URL backfilled at commit time when a draft has none.
pub const FALLBACK_ICON_URL: &str = "https://i.imgur.com/CRHS2ni.png";

/// Icon URL the renderer falls back to when a stored marker has none.
pub const RENDER_FALLBACK_ICON_URL: &str = "https://i.imgur.com/oOvZCp8.png";

/// Vertical offset (CSS pixels) lifting the floating edit panel above the
/// click it anchors to.
pub const PANEL_ANCHOR_OFFSET_Y: f64 = 300.0;

/// Half-width of the zoom-visibility window seeded onto a new draft
/// (current zoom +/- this value).
pub const DRAFT_ZOOM_WINDOW_HALF_WIDTH: i32 = 2;

/// Clamp range for the initial zoom derived from the bounds extent.
pub const INITIAL_ZOOM_MIN: f64 = 8.0;
pub const INITIAL_ZOOM_MAX: f64 = 16.0;

/// Initial zoom when a document has no usable bounds.
pub const INITIAL_ZOOM_FALLBACK: f64 = 10.0;

/// Fixed key for the single persisted document slot.
pub const STORAGE_SLOT_KEY: &str = "mapData";

/// Fallback document name used in export filenames.
pub const EXPORT_FALLBACK_NAME: &str = "mapData";
