//! Rasterized proximity field
//!
//! Samples the unit tile on a regular grid and records, per cell, the
//! generator point that owns it (its nearest point) and, when the cell sits
//! on a boundary of the induced Voronoi-like subdivision, the distinct owner
//! on the other side of that boundary.

use glam::Vec2;

use crate::error::{CoastError, Result};
use crate::spatial::SpatialIndex;

/// The one or two nearest generator points recorded for a raster cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClosestPoints {
    /// Owner of the cell
    pub p0: Option<usize>,
    /// Neighbouring owner across a cell boundary, distinct from `p0`
    pub p1: Option<usize>,
}

/// Per-cell ownership of a `resolution x resolution` raster over the tile
///
/// The field keeps the spatial index it was built from, so nearest-owner
/// queries at arbitrary coordinates are exact rather than snapped to the
/// raster.
#[derive(Clone)]
pub struct ProximityField {
    resolution: usize,
    cells: Vec<ClosestPoints>,
    index: SpatialIndex,
}

impl ProximityField {
    /// Rasterize ownership of `points` at the given resolution
    ///
    /// `p1` of a cell is the first owner differing from `p0` among the right,
    /// lower and lower-right cells, in that order.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` when `points` is empty or `resolution` is zero.
    pub fn rasterize(points: &[Vec2], resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(CoastError::DegenerateInput(
                "proximity field resolution must be non-zero".to_string(),
            ));
        }
        let index = SpatialIndex::new(points)?;

        let scale = 1.0 / resolution as f32;
        let mut owners = Vec::with_capacity(resolution * resolution);
        for y in 0..resolution {
            for x in 0..resolution {
                let centre = Vec2::new((x as f32 + 0.5) * scale, (y as f32 + 0.5) * scale);
                owners.push(index.find_nearest(centre));
            }
        }

        let cells = (0..resolution * resolution)
            .map(|i| {
                let (x, y) = (i % resolution, i / resolution);
                let p0 = owners[i];
                let p1 = [(x + 1, y), (x, y + 1), (x + 1, y + 1)]
                    .into_iter()
                    .filter(|&(nx, ny)| nx < resolution && ny < resolution)
                    .map(|(nx, ny)| owners[ny * resolution + nx])
                    .find(|&owner| owner != p0);
                ClosestPoints { p0: Some(p0), p1 }
            })
            .collect();

        Ok(Self {
            resolution,
            cells,
            index,
        })
    }

    /// Raster width and height in cells
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of generator points the field was built over
    #[inline]
    pub fn point_count(&self) -> usize {
        self.index.len()
    }

    /// The closest points recorded for cell `(x, y)`
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> ClosestPoints {
        self.cells[y * self.resolution + x]
    }

    /// All cells, row-major
    #[inline]
    pub fn cells(&self) -> &[ClosestPoints] {
        &self.cells
    }

    /// The generator point nearest to an arbitrary coordinate
    #[inline]
    pub fn owner_at(&self, position: Vec2) -> usize {
        self.index.find_nearest(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_split_the_tile() {
        let points = vec![Vec2::new(0.25, 0.5), Vec2::new(0.75, 0.5)];
        let field = ProximityField::rasterize(&points, 8).unwrap();

        assert_eq!(field.resolution(), 8);
        assert_eq!(field.cell(0, 0).p0, Some(0));
        assert_eq!(field.cell(7, 7).p0, Some(1));

        // The seam between columns 3 and 4 records both owners
        assert_eq!(field.cell(3, 2), ClosestPoints { p0: Some(0), p1: Some(1) });
        assert_eq!(field.cell(1, 2).p1, None);
        assert_eq!(field.cell(7, 2).p1, None);
    }

    #[test]
    fn test_owner_at_is_exact() {
        let points = vec![Vec2::new(0.1, 0.1), Vec2::new(0.12, 0.1)];
        let field = ProximityField::rasterize(&points, 2).unwrap();

        assert_eq!(field.owner_at(points[0]), 0);
        assert_eq!(field.owner_at(points[1]), 1);
        assert_eq!(field.point_count(), 2);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(ProximityField::rasterize(&[], 4).is_err());
        assert!(ProximityField::rasterize(&[Vec2::splat(0.5)], 0).is_err());
    }
}
