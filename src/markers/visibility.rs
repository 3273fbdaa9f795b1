//! Zoom-visibility evaluation.
//!
//! A marker renders only while the zoom level sits inside its inclusive
//! `[min_zoom, max_zoom]` window; an unset side is unbounded. The whole
//! sequence is re-evaluated from scratch on every zoom change so a marker
//! whose visibility flips off always comes back when the zoom returns to
//! its window.

use crate::document::model::Marker;

/// Pure visibility predicate for a single marker at a zoom level
pub fn is_visible(marker: &Marker, zoom: f64) -> bool {
    let above_min = marker.min_zoom.map_or(true, |min| zoom >= min as f64);
    let below_max = marker.max_zoom.map_or(true, |max| zoom <= max as f64);
    above_min && below_max
}

/// Produces a new marker sequence with every `visible` flag recomputed
/// for the given zoom level
pub fn evaluate(markers: &[Marker], zoom: f64) -> Vec<Marker> {
    markers
        .iter()
        .map(|marker| Marker {
            visible: is_visible(marker, zoom),
            ..marker.clone()
        })
        .collect()
}
