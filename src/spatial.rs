//! Spatial indexing for fast coordinate-to-point lookups

use glam::Vec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::error::{CoastError, Result};

/// Wrapper around a 2D KD-tree over the generator points of one round
///
/// Provides O(log n) nearest-neighbor lookups. The proximity field uses it
/// to rasterize point ownership, and the mask projector uses it to find the
/// coarse-round ancestor of every fine-round point.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 2, 32>,
    len: usize,
}

impl SpatialIndex {
    /// Build a spatial index from generator point coordinates
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if `points` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use continent_coast::SpatialIndex;
    /// use glam::Vec2;
    ///
    /// let points = vec![Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.9)];
    /// let index = SpatialIndex::new(&points).unwrap();
    /// assert_eq!(index.find_nearest(Vec2::new(0.2, 0.0)), 0);
    /// ```
    pub fn new(points: &[Vec2]) -> Result<Self> {
        if points.is_empty() {
            return Err(CoastError::DegenerateInput(
                "cannot index an empty point set".to_string(),
            ));
        }

        let coords: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();

        Ok(Self {
            tree: ImmutableKdTree::new_from_slice(&coords),
            len: points.len(),
        })
    }

    /// Number of indexed points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: an index is never built over zero points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the index of the generator point nearest to `position`
    ///
    /// When several points are exactly equidistant the KD-tree returns one
    /// of them, not necessarily the lowest index. The choice depends only on
    /// the indexed coordinates, so it is stable for a given point set.
    pub fn find_nearest(&self, position: Vec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
