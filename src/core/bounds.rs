use crate::core::constants::MAX_LOGICAL_EXTENT;
use crate::core::geo::LogicalCoord;
use serde::{Deserialize, Serialize};

/// Rectangular extent of the map in logical coordinates.
///
/// Serialized as a pair of opposite corners `[[0,0],[h,w]]`, the shape
/// the document format uses for `map.bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[[f64; 2]; 2]", from = "[[f64; 2]; 2]")]
pub struct LogicalBounds {
    pub min: LogicalCoord,
    pub max: LogicalCoord,
}

impl LogicalBounds {
    /// Creates new bounds from two opposite corners
    pub fn new(min: LogicalCoord, max: LogicalCoord) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self::new(
            LogicalCoord::new(min_lat, min_lng),
            LogicalCoord::new(max_lat, max_lng),
        )
    }

    /// The degenerate unit-square fallback used when image dimensions are
    /// unknown.
    pub fn unit() -> Self {
        Self::from_coords(0.0, 0.0, 1.0, 1.0)
    }

    /// Derives normalized bounds from raw image pixel dimensions.
    ///
    /// Both dimensions are repeatedly halved until neither exceeds
    /// [`MAX_LOGICAL_EXTENT`], preserving the aspect ratio; fractional
    /// results are kept. This keeps `log2` of the extent in a small
    /// integer range no matter the source resolution. Returns `None` for
    /// zero dimensions, leaving the caller on the unit-square fallback.
    pub fn from_image_size(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let mut w = width as f64;
        let mut h = height as f64;
        while h > MAX_LOGICAL_EXTENT || w > MAX_LOGICAL_EXTENT {
            h /= 2.0;
            w /= 2.0;
        }

        Some(Self::from_coords(0.0, 0.0, h, w))
    }

    /// Checks if the bounds contain a coordinate (edges inclusive)
    pub fn contains(&self, coord: &LogicalCoord) -> bool {
        coord.lat >= self.min.lat
            && coord.lat <= self.max.lat
            && coord.lng >= self.min.lng
            && coord.lng <= self.max.lng
    }

    /// Gets the center coordinate of the bounds
    pub fn center(&self) -> LogicalCoord {
        LogicalCoord::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lng + self.max.lng) / 2.0,
        )
    }

    /// Gets the per-axis span of the bounds
    pub fn span(&self) -> LogicalCoord {
        LogicalCoord::new(self.max.lat - self.min.lat, self.max.lng - self.min.lng)
    }

    /// The larger of the two axis spans
    pub fn max_extent(&self) -> f64 {
        let span = self.span();
        span.lat.max(span.lng)
    }

    /// Checks if the bounds are well-formed (min <= max on both axes)
    pub fn is_valid(&self) -> bool {
        self.min.lat <= self.max.lat && self.min.lng <= self.max.lng
    }
}

impl Default for LogicalBounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<[[f64; 2]; 2]> for LogicalBounds {
    fn from(corners: [[f64; 2]; 2]) -> Self {
        Self::new(corners[0].into(), corners[1].into())
    }
}

impl From<LogicalBounds> for [[f64; 2]; 2] {
    fn from(bounds: LogicalBounds) -> Self {
        [bounds.min.into(), bounds.max.into()]
    }
}
