//! Per-round geometry: points, proximity raster, adjacency and tile boundary
//!
//! Everything in a [`RoundGeometry`] is derived fresh for each resolution
//! round and never mutated afterwards.

mod adjacency;
mod boundary;
mod points;
mod proximity;

pub use adjacency::AdjacencyGraph;
pub use boundary::{border_points, corner_points, CORNER_ZONE_FRACTION};
pub use points::{JitteredGrid, PointGenerator};
pub use proximity::{ClosestPoints, ProximityField};

use glam::Vec2;
use rand::RngCore;

use crate::error::{CoastError, Result};
use crate::mask::PointSet;

/// Immutable geometry of one resolution round
#[derive(Clone)]
pub struct RoundGeometry {
    /// Grid stride the points were generated at
    pub stride: usize,
    /// Generator point coordinates, indexed by point index
    pub points: Vec<Vec2>,
    /// Rasterized ownership used for adjacency and projection
    pub field: ProximityField,
    /// Neighbour graph
    pub graph: AdjacencyGraph,
    /// Points on the tile edge (always water)
    pub border: PointSet,
    /// Points in the corner zones
    pub corner: PointSet,
}

impl RoundGeometry {
    /// Derive field, graph and boundary sets from an existing point set
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if `points` is empty or `raster_scale` is zero.
    pub fn from_points(stride: usize, points: Vec<Vec2>, raster_scale: usize) -> Result<Self> {
        if points.is_empty() {
            return Err(CoastError::DegenerateInput(format!(
                "stride {} produced no points",
                stride
            )));
        }

        // Step 1: Rasterize point ownership
        let field = ProximityField::rasterize(&points, stride.max(1) * raster_scale)?;

        // Step 2: Adjacency from cells with two owners
        let graph = AdjacencyGraph::from_field(&field);

        // Step 3: Tile boundary classification
        let border = border_points(&field);
        let corner = corner_points(&field);

        Ok(Self {
            stride,
            points,
            field,
            graph,
            border,
            corner,
        })
    }

    /// Generate points with `generator` and derive the round geometry
    pub fn generate<G>(
        generator: &G,
        stride: usize,
        raster_scale: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self>
    where
        G: PointGenerator + ?Sized,
    {
        let points = generator.generate(stride, rng);
        Self::from_points(stride, points, raster_scale)
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
