//! Point adjacency graph
//!
//! Two generator points are neighbours when their raster cells touch: every
//! proximity-field cell that records two distinct owners contributes an
//! undirected edge between them.

use crate::error::{CoastError, Result};
use crate::generation::ProximityField;

/// Undirected neighbour graph over the points of one round
///
/// Neighbour lists are sorted and free of duplicates and self loops. The
/// graph is immutable once built; a point with no recorded neighbours is an
/// isolated node and every consumer treats its empty list as valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Derive adjacency from a rasterized proximity field
    pub fn from_field(field: &ProximityField) -> Self {
        let edges = field.cells().iter().filter_map(|cell| match (cell.p0, cell.p1) {
            (Some(a), Some(b)) if a != b => Some((a, b)),
            _ => None,
        });
        Self::from_edges(field.point_count(), edges)
    }

    /// Build a graph from undirected edges
    ///
    /// Each edge is inserted in both directions, so the result is symmetric
    /// by construction. Self loops and edges touching points outside
    /// `0..point_count` are dropped.
    pub fn from_edges<I>(point_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut neighbors = vec![Vec::new(); point_count];
        for (a, b) in edges {
            if a == b || a >= point_count || b >= point_count {
                continue;
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    /// Wrap explicit neighbour lists, checking symmetry
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the lists are asymmetric, reference a
    /// missing point or contain a self loop.
    pub fn from_neighbors(mut neighbors: Vec<Vec<usize>>) -> Result<Self> {
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        let graph = Self { neighbors };
        graph.verify()?;
        Ok(graph)
    }

    /// Number of points (graph nodes)
    #[inline]
    pub fn point_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Sorted neighbours of `point`
    #[inline]
    pub fn neighbors(&self, point: usize) -> &[usize] {
        &self.neighbors[point]
    }

    /// Returns true if `a` and `b` are adjacent (binary search)
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors
            .get(a)
            .map(|list| list.binary_search(&b).is_ok())
            .unwrap_or(false)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Check that adjacency is symmetric, in range and loop free
    pub fn verify(&self) -> Result<()> {
        let count = self.neighbors.len();
        for (point, list) in self.neighbors.iter().enumerate() {
            for &other in list {
                if other >= count {
                    return Err(CoastError::InvariantViolation(format!(
                        "point {} lists neighbour {} outside 0..{}",
                        point, other, count
                    )));
                }
                if other == point {
                    return Err(CoastError::InvariantViolation(format!(
                        "point {} is adjacent to itself",
                        point
                    )));
                }
                if !self.are_adjacent(other, point) {
                    return Err(CoastError::InvariantViolation(format!(
                        "asymmetric adjacency: {} -> {} has no reverse edge",
                        point, other
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_from_edges_is_symmetric_and_sorted() {
        let graph = AdjacencyGraph::from_edges(4, [(2, 0), (0, 1), (1, 0), (3, 3), (0, 9)]);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert_eq!(graph.neighbors(2), &[0]);
        assert!(graph.neighbors(3).is_empty());
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.verify().is_ok());
    }

    #[test]
    fn test_from_neighbors_rejects_asymmetry() {
        let result = AdjacencyGraph::from_neighbors(vec![vec![1], vec![]]);
        assert!(matches!(result, Err(CoastError::InvariantViolation(_))));

        let result = AdjacencyGraph::from_neighbors(vec![vec![0]]);
        assert!(matches!(result, Err(CoastError::InvariantViolation(_))));
    }

    #[test]
    fn test_from_field_lattice() {
        // 2x2 lattice: every point touches the other three through the raster
        let points = vec![
            Vec2::new(0.25, 0.25),
            Vec2::new(0.75, 0.25),
            Vec2::new(0.25, 0.75),
            Vec2::new(0.75, 0.75),
        ];
        let field = ProximityField::rasterize(&points, 8).unwrap();
        let graph = AdjacencyGraph::from_field(&field);

        assert!(graph.verify().is_ok());
        assert!(graph.are_adjacent(0, 1));
        assert!(graph.are_adjacent(0, 2));
        assert!(graph.are_adjacent(1, 3));
        assert!(graph.are_adjacent(2, 3));
        assert!(!graph.are_adjacent(0, 0));
    }

    #[test]
    fn test_isolated_point_has_empty_neighbours() {
        let graph = AdjacencyGraph::from_edges(3, [(0, 1)]);
        assert!(graph.neighbors(2).is_empty());
        assert!(graph.verify().is_ok());
    }
}
