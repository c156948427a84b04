//! Border and corner classification
//!
//! Border points own at least one raster cell on the tile edge. They are
//! kept as water in every round so neighbouring tiles can be stitched along
//! a water seam. Corner points own a cell inside one of the four triangular
//! corner zones; the seed round keeps its initial land blob off them.

use crate::generation::ProximityField;
use crate::mask::PointSet;

/// Fraction of the raster side covered by each triangular corner zone
pub const CORNER_ZONE_FRACTION: f32 = 0.293;

/// Collect the owners of every cell on the four raster edges
pub fn border_points(field: &ProximityField) -> PointSet {
    let last = field.resolution() - 1;
    let mut owners = Vec::with_capacity(4 * field.resolution());
    for i in 0..=last {
        for (x, y) in [(i, 0), (i, last), (0, i), (last, i)] {
            if let Some(owner) = field.cell(x, y).p0 {
                owners.push(owner);
            }
        }
    }
    PointSet::from_points(field.point_count(), owners)
}

/// Collect the owners of the four diagonal-cropped corner zones
///
/// Each zone is the triangle `x + y <= w` anchored at a corner, where
/// `w = round(resolution * 0.293) - 1`.
pub fn corner_points(field: &ProximityField) -> PointSet {
    let resolution = field.resolution();
    let last = resolution - 1;
    let zone = (resolution as f32 * CORNER_ZONE_FRACTION).round() as usize;
    let mut owners = Vec::new();

    if let Some(width) = zone.checked_sub(1) {
        let width = width.min(last);
        for y in 0..=width {
            for x in 0..=(width - y) {
                for (cx, cy) in [(x, y), (last - x, y), (x, last - y), (last - x, last - y)] {
                    if let Some(owner) = field.cell(cx, cy).p0 {
                        owners.push(owner);
                    }
                }
            }
        }
    }

    PointSet::from_points(field.point_count(), owners)
}
