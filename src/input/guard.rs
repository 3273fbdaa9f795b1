//! Bounds containment guard.
//!
//! The only correctness-critical gate on marker placement: a click turns
//! into a draft marker only when edit mode is on, the event did not come
//! from reserved chrome, the document actually has bounds, and the
//! projected coordinate lies inside them (edges inclusive). A missing
//! bounds value rejects -- it must never silently pass as "contained".

use crate::core::bounds::LogicalBounds;
use crate::core::geo::LogicalCoord;
use crate::input::events::TargetRegion;

/// Why a placement attempt was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementRejection {
    #[error("edit mode is off")]
    EditModeOff,

    #[error("click originated from reserved chrome")]
    ReservedChrome,

    #[error("map bounds are not defined")]
    MissingBounds,

    #[error("coordinate lies outside the map bounds")]
    OutOfBounds,
}

/// Stateless placement gate
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementGuard;

impl PlacementGuard {
    /// Accepts or rejects a candidate marker coordinate
    pub fn check(
        edit_mode: bool,
        region: TargetRegion,
        bounds: Option<&LogicalBounds>,
        coord: &LogicalCoord,
    ) -> Result<(), PlacementRejection> {
        if !edit_mode {
            return Err(PlacementRejection::EditModeOff);
        }
        if region == TargetRegion::ReservedChrome {
            log::debug!("placement rejected: click on reserved chrome");
            return Err(PlacementRejection::ReservedChrome);
        }
        let Some(bounds) = bounds else {
            log::warn!("placement rejected: map bounds are not defined");
            return Err(PlacementRejection::MissingBounds);
        };
        if !bounds.contains(coord) {
            log::debug!(
                "placement rejected: ({}, {}) outside bounds",
                coord.lat,
                coord.lng
            );
            return Err(PlacementRejection::OutOfBounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> LogicalBounds {
        LogicalBounds::from_coords(0.0, 0.0, 5.0, 10.0)
    }

    #[test]
    fn test_accepts_interior_and_edge_coordinates() {
        let b = bounds();
        for coord in [
            LogicalCoord::new(2.5, 5.0),
            LogicalCoord::new(0.0, 0.0),
            LogicalCoord::new(5.0, 10.0),
            LogicalCoord::new(0.0, 10.0),
        ] {
            assert_eq!(
                PlacementGuard::check(true, TargetRegion::MapSurface, Some(&b), &coord),
                Ok(())
            );
        }
    }

    #[test]
    fn test_rejects_outside_any_edge() {
        let b = bounds();
        for coord in [
            LogicalCoord::new(-0.01, 5.0),
            LogicalCoord::new(5.01, 5.0),
            LogicalCoord::new(2.5, -0.01),
            LogicalCoord::new(2.5, 10.01),
        ] {
            assert_eq!(
                PlacementGuard::check(true, TargetRegion::MapSurface, Some(&b), &coord),
                Err(PlacementRejection::OutOfBounds)
            );
        }
    }

    #[test]
    fn test_rejects_chrome_regardless_of_coordinate() {
        let b = bounds();
        assert_eq!(
            PlacementGuard::check(
                true,
                TargetRegion::ReservedChrome,
                Some(&b),
                &LogicalCoord::new(2.5, 5.0)
            ),
            Err(PlacementRejection::ReservedChrome)
        );
    }

    #[test]
    fn test_rejects_when_edit_mode_off() {
        let b = bounds();
        assert_eq!(
            PlacementGuard::check(
                false,
                TargetRegion::MapSurface,
                Some(&b),
                &LogicalCoord::new(2.5, 5.0)
            ),
            Err(PlacementRejection::EditModeOff)
        );
    }

    #[test]
    fn test_rejects_missing_bounds() {
        assert_eq!(
            PlacementGuard::check(
                true,
                TargetRegion::MapSurface,
                None,
                &LogicalCoord::new(0.5, 0.5)
            ),
            Err(PlacementRejection::MissingBounds)
        );
    }
}
