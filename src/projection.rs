//! Nearest-ancestor mask projection
//!
//! Seeds a finer round with the coarser round's shape: every new point
//! copies the state of the old point nearest to it, so continent-scale
//! shape is stable across the resolution pyramid while each round only adds
//! fresh detail.

use glam::Vec2;

use crate::error::{CoastError, Result};
use crate::generation::ProximityField;
use crate::mask::{RegionMask, WaterMask};

/// For each new point, the index of its nearest old point
pub fn ancestors(old_field: &ProximityField, new_points: &[Vec2]) -> Vec<usize> {
    new_points.iter().map(|&p| old_field.owner_at(p)).collect()
}

/// Copy water state from ancestors onto the new point set
///
/// # Errors
///
/// Returns `DegenerateInput` if the old mask does not cover the old field.
pub fn project_water(
    old_field: &ProximityField,
    old_water: &WaterMask,
    new_points: &[Vec2],
) -> Result<WaterMask> {
    check_coverage(old_field, old_water.len())?;
    let flags = ancestors(old_field, new_points)
        .into_iter()
        .map(|ancestor| old_water.is_water(ancestor))
        .collect();
    Ok(WaterMask::from_flags(flags))
}

/// Copy region ids from ancestors onto the new point set
pub fn project_regions(
    old_field: &ProximityField,
    old_regions: &RegionMask,
    new_points: &[Vec2],
) -> Result<RegionMask> {
    check_coverage(old_field, old_regions.len())?;
    let ids = ancestors(old_field, new_points)
        .into_iter()
        .map(|ancestor| old_regions.get(ancestor))
        .collect();
    Ok(RegionMask::from_ids(ids))
}

fn check_coverage(old_field: &ProximityField, mask_len: usize) -> Result<()> {
    if mask_len != old_field.point_count() {
        return Err(CoastError::DegenerateInput(format!(
            "mask covers {} points but the proximity field was built over {}",
            mask_len,
            old_field.point_count()
        )));
    }
    Ok(())
}
