//! JSON codec for the map document.
//!
//! Import is a strict parse into the typed document shape with
//! default-value backfilling; export is pretty-printed JSON plus a
//! timestamped download filename. The derived per-marker `visible` flag
//! is deliberately excluded from the persisted shape and recomputed at
//! load time.

use crate::core::constants::EXPORT_FALLBACK_NAME;
use crate::document::model::MapDocument;
use crate::{MapError, Result};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const EXPORT_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]:[hour]:[minute]");

/// Parses an imported JSON document.
///
/// On failure the error carries the parse diagnostics and no existing
/// document is touched; the caller decides whether to surface it.
pub fn deserialize(json_text: &str) -> Result<MapDocument> {
    let document: MapDocument = serde_json::from_str(json_text)?;
    log::info!(
        "imported document '{}' with {} markers",
        document.map.name,
        document.markers.len()
    );
    Ok(document)
}

/// Serializes a document to pretty-printed JSON
pub fn serialize(document: &MapDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(MapError::Parse)
}

/// Download filename for an export: `{name}-{YYYY-MM-DD:HH:MM}.json`,
/// falling back to a fixed name when the map is unnamed.
pub fn export_file_name(document: &MapDocument, now: OffsetDateTime) -> String {
    let name = if document.map.name.is_empty() {
        EXPORT_FALLBACK_NAME
    } else {
        document.map.name.as_str()
    };
    let stamp = now
        .format(EXPORT_TIMESTAMP)
        .unwrap_or_else(|_| String::from("unknown"));
    format!("{name}-{stamp}.json")
}
