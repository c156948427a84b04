//! Coastline state of one round
//!
//! A [`Coastline`] owns the water mask and the coastal frontier index of a
//! round and keeps them in lockstep: every land/water flip goes through
//! [`Coastline::set_water`], which updates the frontier incrementally.
//!
//! The stochastic grower (`reduce_coastline`, `build_up_coastline`) and the
//! flood-fill cleaner (`remove_lakes`, `remove_islands`) are implemented as
//! methods in the submodules.

mod cleaner;
mod frontier;
mod grower;

pub use cleaner::{CleanReport, IslandBounds};
pub use frontier::{FrontierIndex, DEGREE_BUCKETS};

use crate::error::{CoastError, Result};
use crate::generation::AdjacencyGraph;
use crate::mask::{PointSet, WaterMask};

/// Water mask plus frontier index over a fixed adjacency graph
#[derive(Debug, Clone)]
pub struct Coastline<'g> {
    graph: &'g AdjacencyGraph,
    water: WaterMask,
    frontier: FrontierIndex,
}

impl<'g> Coastline<'g> {
    /// Wrap a water mask, building its frontier index from scratch
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if the mask and graph disagree on point count.
    pub fn new(graph: &'g AdjacencyGraph, water: WaterMask) -> Result<Self> {
        if water.len() != graph.point_count() {
            return Err(CoastError::DegenerateInput(format!(
                "water mask covers {} points but the graph has {}",
                water.len(),
                graph.point_count()
            )));
        }
        let frontier = FrontierIndex::build(graph, &water);
        Ok(Self {
            graph,
            water,
            frontier,
        })
    }

    #[inline]
    pub fn graph(&self) -> &'g AdjacencyGraph {
        self.graph
    }

    #[inline]
    pub fn water(&self) -> &WaterMask {
        &self.water
    }

    #[inline]
    pub fn frontier(&self) -> &FrontierIndex {
        &self.frontier
    }

    #[inline]
    pub fn land_count(&self) -> usize {
        self.water.land_count()
    }

    /// Release the water mask, dropping the frontier
    pub fn into_water(self) -> WaterMask {
        self.water
    }

    /// Set a point's state and update the frontier; returns true on change
    pub fn set_water(&mut self, point: usize, water: bool) -> bool {
        if !self.water.set(point, water) {
            return false;
        }
        self.frontier.on_point_flips(point, self.graph, &self.water);
        true
    }

    /// Force every border point to water
    ///
    /// Returns the number of points flipped.
    pub fn flood_border(&mut self, border: &PointSet) -> usize {
        border
            .members()
            .iter()
            .filter(|&&point| self.set_water(point, true))
            .count()
    }

    /// Check that the border is entirely water
    pub fn verify_border(&self, border: &PointSet) -> Result<()> {
        match border.members().iter().find(|&&p| self.water.is_land(p)) {
            Some(&point) => Err(CoastError::InvariantViolation(format!(
                "border point {} is land",
                point
            ))),
            None => Ok(()),
        }
    }

    /// Check frontier consistency and that the border is entirely water
    pub fn verify(&self, border: &PointSet) -> Result<()> {
        self.verify_border(border)?;
        self.frontier.verify(self.graph, &self.water)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(count: usize) -> AdjacencyGraph {
        AdjacencyGraph::from_edges(count, (1..count).map(|i| (i - 1, i)))
    }

    #[test]
    fn test_set_water_keeps_frontier_in_lockstep() {
        let graph = path(5);
        let mut coast = Coastline::new(&graph, WaterMask::from_water_points(5, [0, 4])).unwrap();
        assert_eq!(coast.frontier().len(), 2);

        assert!(coast.set_water(2, true));
        assert!(!coast.set_water(2, true));
        assert_eq!(coast.frontier().degree(1), 2);
        assert_eq!(coast.frontier().degree(3), 2);
        assert!(coast.verify(&PointSet::from_points(5, [0, 4])).is_ok());
    }

    #[test]
    fn test_flood_border() {
        let graph = path(4);
        let border = PointSet::from_points(4, [0, 3]);
        let mut coast = Coastline::new(&graph, WaterMask::all_land(4)).unwrap();

        assert!(coast.verify(&border).is_err());
        assert_eq!(coast.flood_border(&border), 2);
        assert_eq!(coast.flood_border(&border), 0);
        assert!(coast.verify(&border).is_ok());
    }

    #[test]
    fn test_mismatched_mask_rejected() {
        let graph = path(3);
        assert!(Coastline::new(&graph, WaterMask::all_water(4)).is_err());
    }
}
