//! Per-point masks carried through the resolution rounds
//!
//! All masks are dense and indexed by point index. They are only meaningful
//! within the round that produced them; the projector maps them onto the
//! next round's points.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An immutable set of point indices (border or corner points)
///
/// Stores both the sorted member list, for deterministic iteration, and a
/// dense membership mask for O(1) lookups.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointSet {
    members: Vec<usize>,
    contains: Vec<bool>,
}

impl PointSet {
    /// Build a set over `point_count` points from any iterator of members
    ///
    /// Members outside `0..point_count` are ignored; duplicates collapse.
    pub fn from_points<I: IntoIterator<Item = usize>>(point_count: usize, points: I) -> Self {
        let mut contains = vec![false; point_count];
        for point in points {
            if point < point_count {
                contains[point] = true;
            }
        }
        let members = contains
            .iter()
            .enumerate()
            .filter_map(|(i, &inside)| inside.then_some(i))
            .collect();
        Self { members, contains }
    }

    /// Union of two sets over the same point count
    pub fn union(&self, other: &PointSet) -> PointSet {
        let count = self.contains.len().max(other.contains.len());
        PointSet::from_points(
            count,
            self.members.iter().chain(other.members.iter()).copied(),
        )
    }

    #[inline]
    pub fn contains(&self, point: usize) -> bool {
        self.contains.get(point).copied().unwrap_or(false)
    }

    /// Members in ascending order
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Land/water classification of every point in a round
///
/// Land is the complement of water and is never stored separately.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterMask {
    water: Vec<bool>,
    water_count: usize,
}

impl WaterMask {
    /// A mask where every point is water
    pub fn all_water(point_count: usize) -> Self {
        Self {
            water: vec![true; point_count],
            water_count: point_count,
        }
    }

    /// A mask where every point is land
    pub fn all_land(point_count: usize) -> Self {
        Self {
            water: vec![false; point_count],
            water_count: 0,
        }
    }

    /// Build a mask from explicit per-point flags
    pub fn from_flags(water: Vec<bool>) -> Self {
        let water_count = water.iter().filter(|&&w| w).count();
        Self { water, water_count }
    }

    /// Build a mask over `point_count` points with the given water points
    pub fn from_water_points<I: IntoIterator<Item = usize>>(point_count: usize, points: I) -> Self {
        let mut mask = Self::all_land(point_count);
        for point in points {
            mask.set(point, true);
        }
        mask
    }

    #[inline]
    pub fn is_water(&self, point: usize) -> bool {
        self.water[point]
    }

    #[inline]
    pub fn is_land(&self, point: usize) -> bool {
        !self.water[point]
    }

    /// Set a point's state, returning true if it changed
    ///
    /// Callers that maintain a frontier index must go through
    /// [`Coastline::set_water`](crate::coastline::Coastline::set_water) instead.
    #[inline]
    pub fn set(&mut self, point: usize, water: bool) -> bool {
        if self.water[point] == water {
            return false;
        }
        self.water[point] = water;
        if water {
            self.water_count += 1;
        } else {
            self.water_count -= 1;
        }
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.water.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.water.is_empty()
    }

    #[inline]
    pub fn water_count(&self) -> usize {
        self.water_count
    }

    #[inline]
    pub fn land_count(&self) -> usize {
        self.water.len() - self.water_count
    }

    /// Fraction of points that are land
    pub fn land_fraction(&self) -> f32 {
        if self.water.is_empty() {
            0.0
        } else {
            self.land_count() as f32 / self.water.len() as f32
        }
    }

    /// Water point indices in ascending order
    pub fn water_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.water
            .iter()
            .enumerate()
            .filter_map(|(i, &w)| w.then_some(i))
    }

    /// Land point indices in ascending order
    pub fn land_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.water
            .iter()
            .enumerate()
            .filter_map(|(i, &w)| (!w).then_some(i))
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.water
    }
}

/// Region id of every point; `0` marks water or unassigned land
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    ids: Vec<u32>,
}

impl RegionMask {
    /// Region id used for water and unassigned land
    pub const UNASSIGNED: u32 = 0;

    /// A mask with every point unassigned
    pub fn unassigned(point_count: usize) -> Self {
        Self {
            ids: vec![Self::UNASSIGNED; point_count],
        }
    }

    pub fn from_ids(ids: Vec<u32>) -> Self {
        Self { ids }
    }

    #[inline]
    pub fn get(&self, point: usize) -> u32 {
        self.ids[point]
    }

    #[inline]
    pub fn set(&mut self, point: usize, region: u32) {
        self.ids[point] = region;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    /// Highest region id present (0 if none)
    pub fn max_region(&self) -> u32 {
        self.ids.iter().copied().max().unwrap_or(Self::UNASSIGNED)
    }

    /// Number of points carrying each region id, indexed by id
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.max_region() as usize + 1];
        for &id in &self.ids {
            sizes[id as usize] += 1;
        }
        sizes
    }
}
