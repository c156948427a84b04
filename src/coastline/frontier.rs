//! Coastal frontier index
//!
//! Tracks every land point that touches water, together with its coastal
//! degree (number of water neighbours), bucketed by degree so that deeply
//! indented coastal points can be sampled preferentially.
//!
//! # Layout
//!
//! Six buckets hold degrees 1 to 5 exactly and 6-or-more together. Each
//! point stores its exact degree and its slot inside its bucket, so
//! membership tests, inserts and removals are all O(1) (removal is a
//! swap-remove that patches the slot of the moved point).

use rand::Rng;

use crate::error::{CoastError, Result};
use crate::generation::AdjacencyGraph;
use crate::mask::WaterMask;

/// Number of degree buckets (degrees 1..=5 exact, bucket 6 means ">= 6")
pub const DEGREE_BUCKETS: usize = 6;

/// Bucket holding a point with the given non-zero degree
#[inline]
fn bucket_of(degree: u32) -> usize {
    (degree as usize).min(DEGREE_BUCKETS) - 1
}

/// Degree-bucketed set of coastal land points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierIndex {
    /// Exact coastal degree per point; 0 means "not on the frontier"
    degrees: Vec<u32>,
    /// Position of each frontier point inside its bucket
    slots: Vec<usize>,
    buckets: [Vec<usize>; DEGREE_BUCKETS],
}

impl FrontierIndex {
    /// Build the index from scratch in one O(E) pass
    ///
    /// Every water point increments the degree of each of its land
    /// neighbours; land points with a non-zero degree are then bucketed in
    /// ascending point order.
    pub fn build(graph: &AdjacencyGraph, water: &WaterMask) -> Self {
        let count = graph.point_count();
        let mut index = Self {
            degrees: vec![0; count],
            slots: vec![0; count],
            buckets: Default::default(),
        };

        let mut degrees = vec![0u32; count];
        for point in water.water_points() {
            for &neighbor in graph.neighbors(point) {
                if water.is_land(neighbor) {
                    degrees[neighbor] += 1;
                }
            }
        }

        for (point, &degree) in degrees.iter().enumerate() {
            if degree > 0 {
                index.insert(point, degree);
            }
        }

        index
    }

    /// Number of frontier points
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Stored coastal degree of a point (0 if not on the frontier)
    #[inline]
    pub fn degree(&self, point: usize) -> u32 {
        self.degrees[point]
    }

    #[inline]
    pub fn contains(&self, point: usize) -> bool {
        self.degrees[point] > 0
    }

    /// Points in bucket `bucket` (0-based, degree `bucket + 1`)
    pub fn bucket(&self, bucket: usize) -> &[usize] {
        &self.buckets[bucket]
    }

    /// Pick a frontier point, weighting bucket `d` by `len(d) * 2^d`
    ///
    /// Buckets are scanned in fixed ascending order against one uniform draw,
    /// then a second draw picks uniformly inside the chosen bucket. Returns
    /// `None` without consuming randomness when the frontier is empty.
    pub fn pick_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let mut weights = [0.0f32; DEGREE_BUCKETS];
        let mut total = 0.0f32;
        for (d, bucket) in self.buckets.iter().enumerate() {
            weights[d] = (bucket.len() * (1 << d)) as f32;
            total += weights[d];
        }
        if total <= 0.0 {
            return None;
        }

        let mut subtotal = 0.0f32;
        for weight in &mut weights {
            subtotal += *weight / total;
            *weight = subtotal;
        }

        let pick: f32 = rng.gen();
        let chosen = (0..DEGREE_BUCKETS)
            .find(|&d| pick < weights[d] && !self.buckets[d].is_empty())
            .or_else(|| (0..DEGREE_BUCKETS).find(|&d| !self.buckets[d].is_empty()))?;

        let bucket = &self.buckets[chosen];
        Some(bucket[rng.gen_range(0..bucket.len())])
    }

    /// Update the index after `point` flipped between land and water
    ///
    /// `water` must already reflect the new state. Touches only `point` and
    /// its neighbours, so the cost is O(degree of point).
    pub fn on_point_flips(&mut self, point: usize, graph: &AdjacencyGraph, water: &WaterMask) {
        if water.is_water(point) {
            self.set_degree(point, 0);
            for &neighbor in graph.neighbors(point) {
                if water.is_land(neighbor) {
                    let degree = self.degrees[neighbor] + 1;
                    self.set_degree(neighbor, degree);
                }
            }
        } else {
            let own = graph
                .neighbors(point)
                .iter()
                .filter(|&&n| water.is_water(n))
                .count() as u32;
            self.set_degree(point, own);
            for &neighbor in graph.neighbors(point) {
                if water.is_land(neighbor) {
                    let degree = self.degrees[neighbor].saturating_sub(1);
                    self.set_degree(neighbor, degree);
                }
            }
        }
    }

    /// Re-derive every degree from scratch and compare with the index
    pub fn verify(&self, graph: &AdjacencyGraph, water: &WaterMask) -> Result<()> {
        let mut members = 0;
        for point in 0..graph.point_count() {
            let live = if water.is_land(point) {
                graph
                    .neighbors(point)
                    .iter()
                    .filter(|&&n| water.is_water(n))
                    .count() as u32
            } else {
                0
            };
            let stored = self.degrees[point];
            if stored != live {
                return Err(CoastError::InvariantViolation(format!(
                    "frontier degree of point {} is {} but {} water neighbours are live",
                    point, stored, live
                )));
            }
            if live > 0 {
                members += 1;
                let bucket = &self.buckets[bucket_of(live)];
                if bucket.get(self.slots[point]) != Some(&point) {
                    return Err(CoastError::InvariantViolation(format!(
                        "point {} with degree {} is missing from bucket {}",
                        point,
                        live,
                        bucket_of(live)
                    )));
                }
            }
        }
        if members != self.len() {
            return Err(CoastError::InvariantViolation(format!(
                "frontier buckets hold {} points, expected {}",
                self.len(),
                members
            )));
        }
        Ok(())
    }

    fn set_degree(&mut self, point: usize, degree: u32) {
        let old = self.degrees[point];
        if old == degree {
            return;
        }
        if old > 0 && degree > 0 && bucket_of(old) == bucket_of(degree) {
            self.degrees[point] = degree;
            return;
        }
        if old > 0 {
            self.remove(point);
        }
        if degree > 0 {
            self.insert(point, degree);
        }
    }

    fn insert(&mut self, point: usize, degree: u32) {
        let bucket = &mut self.buckets[bucket_of(degree)];
        self.slots[point] = bucket.len();
        bucket.push(point);
        self.degrees[point] = degree;
    }

    fn remove(&mut self, point: usize) {
        let bucket = &mut self.buckets[bucket_of(self.degrees[point])];
        let slot = self.slots[point];
        bucket.swap_remove(slot);
        if let Some(&moved) = bucket.get(slot) {
            self.slots[moved] = slot;
        }
        self.degrees[point] = 0;
    }
}
