//! Linear, case-insensitive substring search over the marker sequence.
//!
//! Results keep insertion order. An empty query yields no results rather
//! than the full sequence; the result list only exists while the user is
//! actually filtering.

use crate::document::model::Marker;

/// Thin search view over a marker slice
#[derive(Debug, Clone, Copy)]
pub struct SearchIndex<'a> {
    markers: &'a [Marker],
}

impl<'a> SearchIndex<'a> {
    pub fn new(markers: &'a [Marker]) -> Self {
        Self { markers }
    }

    /// Markers whose label or description contains the query as a
    /// case-insensitive substring, in insertion order
    pub fn query(&self, query: &str) -> Vec<&'a Marker> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.markers
            .iter()
            .filter(|m| {
                m.label.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
