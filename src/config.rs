//! Continent Pipeline Configuration and Builder
//!
//! This module provides configuration types for deterministic multi-resolution
//! coastline generation. The round schedule (how hard each round perturbs
//! the coastline and for how many iterations) is plain configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoastError, Result};

/// Maximum number of resolution rounds accepted by the builder
///
/// Point counts grow geometrically with the round, so anything beyond this
/// is impractical.
pub const MAX_ROUNDS: usize = 16;

/// Schedule for the first round, which builds a coastline from nothing
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedSchedule {
    /// Target land share of the non-border points
    pub land_fraction: f32,
    /// Number of erode/grow/clean passes
    pub max_iterations: usize,
    /// Share of current land eroded at the start of each pass
    pub perturbation: f32,
    /// Islands smaller than this fraction of the points are drowned
    pub small_island: f32,
    /// Islands larger than this fraction of the points are drowned
    pub large_island: f32,
}

impl SeedSchedule {
    /// Check every fraction against its range
    pub fn validate(&self) -> Result<()> {
        check_fraction("seed land fraction", self.land_fraction, 0.0, 1.0)?;
        check_fraction("seed perturbation", self.perturbation, 0.0, 1.0)?;
        check_island_window(self.small_island, self.large_island)
    }
}

impl Default for SeedSchedule {
    fn default() -> Self {
        Self {
            land_fraction: 0.6,
            max_iterations: 5,
            perturbation: 0.1,
            small_island: 0.05,
            large_island: 1.0,
        }
    }
}

/// Schedule for refinement rounds (round 2 onwards)
///
/// Perturbation and iteration count both shrink with the round number: early
/// rounds move large masses of land, late rounds only jitter the coast.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineSchedule {
    /// Land share of the non-border points that regrowth restores if erosion dips below it
    pub min_land_fraction: f32,
    /// Perturbation at round 0 before decay
    pub base_perturbation: f32,
    /// Perturbation lost per round
    pub perturbation_decay: f32,
    /// Lower bound on the effective perturbation
    pub perturbation_floor: f32,
    /// Iterations at round 0; one fewer every two rounds, never below one
    pub base_iterations: usize,
    /// Islands smaller than this fraction of the points are drowned
    pub small_island: f32,
    /// Islands larger than this fraction of the points are drowned
    pub large_island: f32,
}

impl Default for RefineSchedule {
    fn default() -> Self {
        Self {
            min_land_fraction: 0.4,
            base_perturbation: 0.1,
            perturbation_decay: 0.03,
            perturbation_floor: 0.005,
            base_iterations: 4,
            small_island: 0.02,
            large_island: 2.0,
        }
    }
}

impl RefineSchedule {
    /// Check every fraction against its range
    pub fn validate(&self) -> Result<()> {
        check_fraction("minimum land fraction", self.min_land_fraction, 0.0, 1.0)?;
        check_fraction("base perturbation", self.base_perturbation, 0.0, 1.0)?;
        check_fraction("perturbation floor", self.perturbation_floor, 0.0, 1.0)?;
        if !self.perturbation_decay.is_finite() || self.perturbation_decay < 0.0 {
            return Err(CoastError::InvalidConfig(format!(
                "perturbation decay must be >= 0 (got {})",
                self.perturbation_decay
            )));
        }
        check_island_window(self.small_island, self.large_island)
    }

    /// Unclamped perturbation term for `round`; negative once decay overtakes the base
    #[inline]
    pub fn min_perturbation(&self, round: usize) -> f32 {
        self.base_perturbation - self.perturbation_decay * round as f32
    }

    /// Effective share of land eroded per iteration in `round`
    #[inline]
    pub fn perturbation(&self, round: usize) -> f32 {
        self.min_perturbation(round).max(self.perturbation_floor)
    }

    /// Number of erode/grow/clean iterations in `round`
    #[inline]
    pub fn iterations(&self, round: usize) -> usize {
        self.base_iterations.saturating_sub(round / 2).max(1)
    }
}

/// Configuration for deterministic continent generation
///
/// The same configuration (and the same point generator and region
/// partitioner) always produces the identical continent.
///
/// # Example
///
/// ```rust
/// use continent_coast::*;
///
/// let config = ContinentConfigBuilder::new()
///     .seed(42)
///     .rounds(5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.stride_at(1), 6);
/// assert_eq!(config.stride_at(2), 9);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinentConfig {
    /// Random seed driving every draw of the run
    pub seed: u64,

    /// Grid stride of round 1 (points per side)
    pub start_stride: usize,

    /// Factor applied to the stride between rounds (floored)
    pub stride_multiplier: f32,

    /// Total number of resolution rounds
    pub rounds: usize,

    /// Proximity raster cells per grid stride step
    ///
    /// Higher values recover short Voronoi edges more reliably at the cost
    /// of O(resolution^2) nearest-point queries per round.
    pub raster_scale: usize,

    /// Round at which land is partitioned into regions
    pub region_round: usize,

    /// Number of regions requested from the partitioner
    pub region_count: u32,

    /// Schedule of round 1
    pub seed_schedule: SeedSchedule,

    /// Schedule of rounds 2 and later
    pub refine_schedule: RefineSchedule,

    /// Keep every round's snapshot, not only the last
    pub keep_history: bool,

    /// Re-derive the frontier from scratch after every round and compare
    ///
    /// Always on in debug builds.
    pub verify_rounds: bool,
}

impl ContinentConfig {
    /// Re-run every builder check
    ///
    /// The fields are public, so a configuration assembled by hand (or with
    /// struct update syntax) can bypass the builder. The pipeline calls this
    /// before its first round.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        check_start_stride(self.start_stride)?;
        check_stride_multiplier(self.stride_multiplier)?;
        check_rounds(self.rounds)?;
        check_raster_scale(self.raster_scale)?;
        check_region_round(self.region_round)?;
        check_region_count(self.region_count)?;
        self.seed_schedule.validate()?;
        self.refine_schedule.validate()
    }

    /// Grid stride of `round` (1-based)
    pub fn stride_at(&self, round: usize) -> usize {
        (1..round).fold(self.start_stride, |stride, _| self.next_stride(stride))
    }

    /// Stride of the round following one at `stride`
    #[inline]
    pub fn next_stride(&self, stride: usize) -> usize {
        (stride as f64 * self.stride_multiplier as f64).floor() as usize
    }
}

impl Default for ContinentConfig {
    fn default() -> Self {
        ContinentConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating ContinentConfig with validation
///
/// # Example
///
/// ```rust
/// use continent_coast::*;
///
/// let config = ContinentConfigBuilder::new()
///     .seed(12345)
///     .start_stride(8)
///     .unwrap()
///     .region_count(5)
///     .unwrap()
///     .keep_history(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.region_count, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ContinentConfigBuilder {
    seed: Option<u64>,
    start_stride: usize,
    stride_multiplier: f32,
    rounds: usize,
    raster_scale: usize,
    region_round: usize,
    region_count: u32,
    seed_schedule: SeedSchedule,
    refine_schedule: RefineSchedule,
    keep_history: bool,
    verify_rounds: bool,
}

impl ContinentConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - start_stride: 6 (36 points in round 1)
    /// - stride_multiplier: 1.64
    /// - rounds: 9
    /// - raster_scale: 8
    /// - region_round: 4, region_count: 8
    pub fn new() -> Self {
        Self {
            seed: None,
            start_stride: 6,
            stride_multiplier: 1.64,
            rounds: 9,
            raster_scale: 8,
            region_round: 4,
            region_count: 8,
            seed_schedule: SeedSchedule::default(),
            refine_schedule: RefineSchedule::default(),
            keep_history: false,
            verify_rounds: false,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the stride of round 1
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if stride < 3 (no interior point to seed land on)
    pub fn start_stride(mut self, stride: usize) -> Result<Self> {
        check_start_stride(stride)?;
        self.start_stride = stride;
        Ok(self)
    }

    /// Set the stride multiplier applied between rounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless multiplier > 1.0 and finite
    pub fn stride_multiplier(mut self, multiplier: f32) -> Result<Self> {
        check_stride_multiplier(multiplier)?;
        self.stride_multiplier = multiplier;
        Ok(self)
    }

    /// Set the number of resolution rounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if rounds is 0 or > MAX_ROUNDS
    pub fn rounds(mut self, rounds: usize) -> Result<Self> {
        check_rounds(rounds)?;
        self.rounds = rounds;
        Ok(self)
    }

    /// Set the raster cells per stride step
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale < 2
    pub fn raster_scale(mut self, scale: usize) -> Result<Self> {
        check_raster_scale(scale)?;
        self.raster_scale = scale;
        Ok(self)
    }

    /// Set the round at which regions are partitioned
    ///
    /// A round past the last one disables region partitioning.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if round is 0
    pub fn region_round(mut self, round: usize) -> Result<Self> {
        check_region_round(round)?;
        self.region_round = round;
        Ok(self)
    }

    /// Set the number of regions
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0 or > 255
    pub fn region_count(mut self, count: u32) -> Result<Self> {
        check_region_count(count)?;
        self.region_count = count;
        Ok(self)
    }

    /// Set the schedule of round 1
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a fraction is outside its range
    pub fn seed_schedule(mut self, schedule: SeedSchedule) -> Result<Self> {
        schedule.validate()?;
        self.seed_schedule = schedule;
        Ok(self)
    }

    /// Set the schedule of rounds 2 and later
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a fraction is outside its range
    pub fn refine_schedule(mut self, schedule: RefineSchedule) -> Result<Self> {
        schedule.validate()?;
        self.refine_schedule = schedule;
        Ok(self)
    }

    /// Keep every round's snapshot in the output
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    /// Verify frontier consistency after every round, in release builds too
    pub fn verify_rounds(mut self, verify: bool) -> Self {
        self.verify_rounds = verify;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<ContinentConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    fn build_unchecked(self) -> ContinentConfig {
        let seed = self.seed.unwrap_or_else(rand::random);

        ContinentConfig {
            seed,
            start_stride: self.start_stride,
            stride_multiplier: self.stride_multiplier,
            rounds: self.rounds,
            raster_scale: self.raster_scale,
            region_round: self.region_round,
            region_count: self.region_count,
            seed_schedule: self.seed_schedule,
            refine_schedule: self.refine_schedule,
            keep_history: self.keep_history,
            verify_rounds: self.verify_rounds,
        }
    }
}

impl Default for ContinentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_start_stride(stride: usize) -> Result<()> {
    if stride < 3 {
        return Err(CoastError::InvalidConfig(format!(
            "start stride must be >= 3 (got {})",
            stride
        )));
    }
    Ok(())
}

fn check_stride_multiplier(multiplier: f32) -> Result<()> {
    if !multiplier.is_finite() || multiplier <= 1.0 {
        return Err(CoastError::InvalidConfig(format!(
            "stride multiplier must be > 1.0 (got {})",
            multiplier
        )));
    }
    Ok(())
}

fn check_rounds(rounds: usize) -> Result<()> {
    if rounds == 0 || rounds > MAX_ROUNDS {
        return Err(CoastError::InvalidConfig(format!(
            "rounds must be in 1..={} (got {})",
            MAX_ROUNDS, rounds
        )));
    }
    Ok(())
}

fn check_raster_scale(scale: usize) -> Result<()> {
    if scale < 2 {
        return Err(CoastError::InvalidConfig(format!(
            "raster scale must be >= 2 (got {})",
            scale
        )));
    }
    Ok(())
}

fn check_region_round(round: usize) -> Result<()> {
    if round == 0 {
        return Err(CoastError::InvalidConfig(
            "region round is 1-based and must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn check_region_count(count: u32) -> Result<()> {
    if count == 0 || count > 255 {
        return Err(CoastError::InvalidConfig(format!(
            "region count must be in 1..=255 (got {})",
            count
        )));
    }
    Ok(())
}

fn check_fraction(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(CoastError::InvalidConfig(format!(
            "{} must be in {}..={} (got {})",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_island_window(small: f32, large: f32) -> Result<()> {
    if !small.is_finite() || !large.is_finite() || small < 0.0 || large < small {
        return Err(CoastError::InvalidConfig(format!(
            "island window must satisfy 0 <= small <= large (got {}..{})",
            small, large
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ContinentConfigBuilder::new().build().unwrap();
        assert_eq!(config.start_stride, 6);
        assert_eq!(config.rounds, 9);
        assert_eq!(config.region_round, 4);
        assert_eq!(config.region_count, 8);
        assert!(!config.keep_history);
        // seed is random, so just verify it was set
        let _seed = config.seed;
    }

    #[test]
    fn test_builder_custom() {
        let config = ContinentConfigBuilder::new()
            .seed(42)
            .start_stride(9)
            .unwrap()
            .stride_multiplier(2.0)
            .unwrap()
            .rounds(3)
            .unwrap()
            .keep_history(true)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.start_stride, 9);
        assert_eq!(config.rounds, 3);
        assert!(config.keep_history);
    }

    #[test]
    fn test_stride_progression() {
        let config = ContinentConfigBuilder::new().seed(1).build().unwrap();
        let strides: Vec<usize> = (1..=9).map(|r| config.stride_at(r)).collect();
        assert_eq!(strides, vec![6, 9, 14, 22, 36, 59, 96, 157, 257]);
    }

    #[test]
    fn test_refine_schedule_shrinks() {
        let schedule = RefineSchedule::default();
        assert!((schedule.perturbation(2) - 0.04).abs() < 1e-6);
        assert!((schedule.perturbation(3) - 0.01).abs() < 1e-6);
        assert!(schedule.min_perturbation(4) < 0.0);
        assert_eq!(schedule.perturbation(4), schedule.perturbation_floor);

        assert_eq!(schedule.iterations(2), 3);
        assert_eq!(schedule.iterations(4), 2);
        assert_eq!(schedule.iterations(6), 1);
        assert_eq!(schedule.iterations(9), 1);
    }

    #[test]
    fn test_invalid_values() {
        assert!(ContinentConfigBuilder::new().start_stride(2).is_err());
        assert!(ContinentConfigBuilder::new().stride_multiplier(1.0).is_err());
        assert!(ContinentConfigBuilder::new().stride_multiplier(f32::NAN).is_err());
        assert!(ContinentConfigBuilder::new().rounds(0).is_err());
        assert!(ContinentConfigBuilder::new().rounds(MAX_ROUNDS + 1).is_err());
        assert!(ContinentConfigBuilder::new().raster_scale(1).is_err());
        assert!(ContinentConfigBuilder::new().region_round(0).is_err());
        assert!(ContinentConfigBuilder::new().region_count(0).is_err());
        assert!(ContinentConfigBuilder::new().region_count(256).is_err());
    }

    #[test]
    fn test_invalid_schedules() {
        let seed = SeedSchedule {
            land_fraction: 1.5,
            ..Default::default()
        };
        assert!(ContinentConfigBuilder::new().seed_schedule(seed).is_err());

        let refine = RefineSchedule {
            small_island: 0.5,
            large_island: 0.1,
            ..Default::default()
        };
        assert!(ContinentConfigBuilder::new().refine_schedule(refine).is_err());

        let refine = RefineSchedule {
            perturbation_decay: -0.1,
            ..Default::default()
        };
        assert!(ContinentConfigBuilder::new().refine_schedule(refine).is_err());
    }

    #[test]
    fn test_validate_catches_hand_built_configs() {
        let base = ContinentConfigBuilder::new().seed(3).build().unwrap();
        assert!(base.validate().is_ok());

        let bad = [
            ContinentConfig { stride_multiplier: 0.5, ..base },
            ContinentConfig { start_stride: 2, ..base },
            ContinentConfig { rounds: 0, ..base },
            ContinentConfig { raster_scale: 0, ..base },
            ContinentConfig { region_round: 0, ..base },
            ContinentConfig { region_count: 300, ..base },
            ContinentConfig {
                seed_schedule: SeedSchedule { perturbation: -0.2, ..base.seed_schedule },
                ..base
            },
            ContinentConfig {
                refine_schedule: RefineSchedule { min_land_fraction: f32::NAN, ..base.refine_schedule },
                ..base
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(CoastError::InvalidConfig(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = ContinentConfigBuilder::new()
            .seed(12345)
            .rounds(4)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: ContinentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
