//! # Mapmark
//!
//! A Rust-native annotation engine for image-based maps, inspired by
//! Leaflet's CRS.Simple mode.
//!
//! An arbitrary raster image becomes a "map" with a small normalized
//! logical coordinate space; labeled markers are placed on it with
//! per-marker zoom-visibility windows, searched, and round-tripped
//! through a JSON document format. Rendering, gesture handling, and
//! widget layout are left to the embedding application; this crate owns
//! the coordinate model, the marker store, and the document lifecycle.

pub mod core;
pub mod document;
pub mod image;
pub mod input;
pub mod markers;
pub mod session;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::LogicalBounds,
    geo::{LogicalCoord, Point},
    viewport::Viewport,
};

pub use crate::document::{
    codec,
    model::{DraftMarker, MapDocument, MapInfo, Marker, MarkerIcon, MarkerId, ScreenAnchor},
    storage::{DocumentStorage, MemoryStorage},
};

pub use crate::markers::{search::SearchIndex, store::MarkerStore, visibility};

pub use crate::input::{
    events::{ClickEvent, MapEvent, TargetRegion},
    guard::{PlacementGuard, PlacementRejection},
};

pub use crate::image::{DimensionResolver, ImageDimensions, ImageSource};

pub use crate::session::{MapSession, ViewCommand};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid JSON file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Map bounds are not defined")]
    MissingBounds,

    #[error("Map image dimensions are not available")]
    MissingDimensions,

    #[error("Image load failed: {0}")]
    ImageLoad(String),

    #[error("Image load timed out after {0:?}")]
    ImageLoadTimeout(std::time::Duration),

    #[error("Stale async result discarded: {0}")]
    StaleResult(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("No draft marker is open")]
    NoDraft,
}

/// Error type alias for convenience
pub type Error = MapError;

/// Wires the `log` facade to env_logger for quick diagnostics
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
