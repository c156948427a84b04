//! Land region partitioning
//!
//! Provides the partitioner seam invoked once per pipeline run, a default
//! flood-fill implementation, and the reconciliation step that keeps a
//! projected region mask consistent with a refined coastline.

use std::collections::VecDeque;

use rand::seq::index;
use rand::RngCore;

use crate::error::{CoastError, Result};
use crate::generation::AdjacencyGraph;
use crate::mask::{RegionMask, WaterMask};

/// Trait for splitting land into numbered regions
///
/// Called exactly once per pipeline run, after the region round's coastline
/// is final. Implementations must return a mask covering every point of
/// `graph`, with `0` on water and ids in `1..=region_count` on land.
pub trait RegionPartitioner {
    fn partition(
        &self,
        graph: &AdjacencyGraph,
        rng: &mut dyn RngCore,
        region_count: u32,
        water: &WaterMask,
    ) -> Result<RegionMask>;
}

/// Default partitioner: seeded breadth-first growth over land
///
/// Seeds are drawn uniformly from land points; region `k` grows from the
/// `k`-th seed drawn. All regions expand in lockstep, so they end up
/// roughly equal in hop radius. Land on islands without a seed takes the
/// region nearest by hop distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodRegionPartitioner;

impl RegionPartitioner for FloodRegionPartitioner {
    fn partition(
        &self,
        graph: &AdjacencyGraph,
        rng: &mut dyn RngCore,
        region_count: u32,
        water: &WaterMask,
    ) -> Result<RegionMask> {
        if region_count == 0 {
            return Err(CoastError::RegionPartition(
                "region count must be at least 1".to_string(),
            ));
        }
        if water.len() != graph.point_count() {
            return Err(CoastError::RegionPartition(format!(
                "water mask covers {} points but the graph has {}",
                water.len(),
                graph.point_count()
            )));
        }

        let mut regions = RegionMask::unassigned(graph.point_count());
        let land: Vec<usize> = water.land_points().collect();
        if land.is_empty() {
            return Ok(regions);
        }

        let amount = (region_count as usize).min(land.len());
        let mut queue = VecDeque::with_capacity(land.len());
        for (k, slot) in index::sample(rng, land.len(), amount).into_iter().enumerate() {
            let seed = land[slot];
            regions.set(seed, k as u32 + 1);
            queue.push_back(seed);
        }

        while let Some(point) = queue.pop_front() {
            let region = regions.get(point);
            for &neighbor in graph.neighbors(point) {
                if water.is_land(neighbor) && regions.get(neighbor) == RegionMask::UNASSIGNED {
                    regions.set(neighbor, region);
                    queue.push_back(neighbor);
                }
            }
        }

        fill_unassigned_land(graph, water, &mut regions);
        Ok(regions)
    }
}

/// Make a projected region mask agree with a refined water mask
///
/// Water is cleared to `0`; land left unassigned (newly grown coast) takes
/// the region of the nearest assigned land point by hop distance. Land with
/// no assigned point reachable stays `0`.
pub fn reconcile_regions(graph: &AdjacencyGraph, water: &WaterMask, regions: &mut RegionMask) {
    for point in water.water_points() {
        regions.set(point, RegionMask::UNASSIGNED);
    }
    fill_unassigned_land(graph, water, regions);
}

/// Multi-source BFS over the whole graph from every assigned land point
fn fill_unassigned_land(graph: &AdjacencyGraph, water: &WaterMask, regions: &mut RegionMask) {
    let count = graph.point_count();
    let mut reached = vec![false; count];
    let mut queue = VecDeque::new();
    let mut source = vec![RegionMask::UNASSIGNED; count];

    for point in 0..count {
        let region = regions.get(point);
        if region != RegionMask::UNASSIGNED && water.is_land(point) {
            reached[point] = true;
            source[point] = region;
            queue.push_back(point);
        }
    }
    if queue.is_empty() {
        return;
    }

    while let Some(point) = queue.pop_front() {
        for &neighbor in graph.neighbors(point) {
            if reached[neighbor] {
                continue;
            }
            reached[neighbor] = true;
            source[neighbor] = source[point];
            if water.is_land(neighbor) {
                regions.set(neighbor, source[point]);
            }
            queue.push_back(neighbor);
        }
    }
}
