//! Flood-fill topology cleanup
//!
//! Lake removal keeps a single ocean connected to the tile border; island
//! removal drops secondary landmasses outside a size window while always
//! keeping the largest landmass.

use std::collections::VecDeque;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Coastline;
use crate::mask::PointSet;

/// Size window for secondary landmasses, in points
///
/// A non-mainland island survives only if `small <= size <= large`. Capping
/// the upper end stops a single run from spawning a second continent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandBounds {
    pub small: usize,
    pub large: usize,
}

impl IslandBounds {
    /// Convert fractions of the round's point count into point counts
    pub fn from_fractions(point_count: usize, small: f32, large: f32) -> Self {
        Self {
            small: (small * point_count as f32).round() as usize,
            large: (large * point_count as f32).round() as usize,
        }
    }

    #[inline]
    pub fn keeps(&self, size: usize) -> bool {
        size >= self.small && size <= self.large
    }
}

/// Points flipped by one [`Coastline::clean`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Water points turned into land because they could not reach the border
    pub lakes_filled: usize,
    /// Land points turned into water because their island was out of bounds
    pub islands_drowned: usize,
}

impl Coastline<'_> {
    /// Turn every water point not connected to the border's water into land
    ///
    /// Returns the number of points filled.
    pub fn remove_lakes(&mut self, border: &PointSet) -> usize {
        let count = self.graph.point_count();
        let mut ocean = vec![false; count];
        let mut queue = VecDeque::new();

        for &point in border.members() {
            if self.water.is_water(point) && !ocean[point] {
                ocean[point] = true;
                queue.push_back(point);
            }
        }
        while let Some(point) = queue.pop_front() {
            for &neighbor in self.graph.neighbors(point) {
                if self.water.is_water(neighbor) && !ocean[neighbor] {
                    ocean[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        let lakes: Vec<usize> = self
            .water
            .water_points()
            .filter(|&point| !ocean[point])
            .collect();
        for &point in &lakes {
            self.set_water(point, false);
        }
        if !lakes.is_empty() {
            debug!(filled = lakes.len(), "lakes removed");
        }
        lakes.len()
    }

    /// Drop secondary land components outside `bounds`
    ///
    /// The largest component is the mainland and is always kept. Returns the
    /// number of points drowned.
    pub fn remove_islands(&mut self, bounds: IslandBounds) -> usize {
        let mut bodies = self.land_bodies();
        // Stable sort: equal sizes keep discovery order, the last one is the mainland
        bodies.sort_by_key(Vec::len);
        bodies.pop();

        let mut drowned = 0;
        for body in bodies.iter().filter(|body| !bounds.keeps(body.len())) {
            for &point in body {
                self.set_water(point, true);
            }
            drowned += body.len();
        }
        if drowned > 0 {
            debug!(drowned, islands = bodies.len(), "islands removed");
        }
        drowned
    }

    /// Lake removal, island removal, then a final lake removal
    ///
    /// A drowned island only borders ocean, so the final pass only settles
    /// isolated graph nodes; afterwards every water point reaches the border.
    pub fn clean(&mut self, border: &PointSet, bounds: IslandBounds) -> CleanReport {
        let mut lakes_filled = self.remove_lakes(border);
        let islands_drowned = self.remove_islands(bounds);
        lakes_filled += self.remove_lakes(border);
        CleanReport {
            lakes_filled,
            islands_drowned,
        }
    }

    /// Connected land components, discovered in ascending point order
    pub fn land_bodies(&self) -> Vec<Vec<usize>> {
        let count = self.graph.point_count();
        let mut visited = vec![false; count];
        let mut bodies = Vec::new();
        let mut queue = VecDeque::new();

        for start in 0..count {
            if visited[start] || self.water.is_water(start) {
                continue;
            }
            let mut body = Vec::new();
            visited[start] = true;
            queue.push_back(start);
            while let Some(point) = queue.pop_front() {
                body.push(point);
                for &neighbor in self.graph.neighbors(point) {
                    if !visited[neighbor] && self.water.is_land(neighbor) {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
            bodies.push(body);
        }

        bodies
    }
}
