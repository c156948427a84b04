//! Multi-resolution continent pipeline
//!
//! Round 1 seeds a single land point on a coarse jittered grid and grows a
//! blob from it. Every later round generates a denser point set, projects the
//! previous round's water and region masks onto it, and re-perturbs the
//! coastline with a shrinking budget. Large-scale shape is therefore stable
//! while the coast gains detail at each resolution.
//!
//! All randomness of one run comes from a single `ChaCha8Rng` seeded from
//! [`ContinentConfig::seed`]; draws happen in a fixed order, so identical
//! configurations produce identical continents.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

use crate::coastline::{CleanReport, Coastline, IslandBounds};
use crate::config::ContinentConfig;
use crate::error::{CoastError, Result};
use crate::generation::{AdjacencyGraph, JitteredGrid, PointGenerator, RoundGeometry};
use crate::mask::{PointSet, RegionMask, WaterMask};
use crate::projection::{project_regions, project_water};
use crate::regions::{reconcile_regions, FloodRegionPartitioner, RegionPartitioner};

/// Extra regrowth passes per refine iteration that retry skipped growth attempts
pub const GROW_RETRY_PASSES: usize = 4;

/// Attempt and flip counts of one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Erosion attempts that found an empty frontier
    pub erode_skips: usize,
    /// Growth attempts that were skipped (empty frontier, landlocked pick, border)
    pub grow_skips: usize,
    /// Water points filled by lake removal
    pub lakes_filled: usize,
    /// Land points drowned by island removal
    pub islands_drowned: usize,
}

impl RoundStats {
    fn add_clean(&mut self, report: CleanReport) {
        self.lakes_filled += report.lakes_filled;
        self.islands_drowned += report.islands_drowned;
    }
}

/// Final state of one resolution round
///
/// Snapshots are handed from round to round by value and never mutated
/// afterwards.
#[derive(Clone)]
pub struct RoundSnapshot {
    /// 1-based round number
    pub round: usize,
    /// Points, raster, graph and boundary sets of the round
    pub geometry: RoundGeometry,
    /// Water state per point
    pub water: WaterMask,
    /// Region id per point, once regions have been partitioned
    pub regions: Option<RegionMask>,
    pub stats: RoundStats,
}

impl RoundSnapshot {
    #[inline]
    pub fn stride(&self) -> usize {
        self.geometry.stride
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.geometry.point_count()
    }

    #[inline]
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.geometry.graph
    }

    #[inline]
    pub fn border(&self) -> &PointSet {
        &self.geometry.border
    }

    fn summary(&self) -> RoundSummary {
        RoundSummary {
            round: self.round,
            stride: self.stride(),
            point_count: self.point_count(),
            land_count: self.water.land_count(),
            stats: self.stats,
        }
    }
}

/// Lightweight per-round report yielded by [`Rounds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: usize,
    pub stride: usize,
    pub point_count: usize,
    pub land_count: usize,
    pub stats: RoundStats,
}

/// Generated continent: the last round plus, optionally, every earlier one
///
/// # Example
///
/// ```
/// use continent_coast::*;
///
/// let config = ContinentConfigBuilder::new()
///     .seed(7)
///     .rounds(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let continent = Continent::generate(config).unwrap();
/// assert_eq!(continent.last().round, 3);
/// assert!(continent.water().land_count() > 0);
/// ```
#[derive(Clone)]
pub struct Continent {
    config: ContinentConfig,
    last: RoundSnapshot,
    history: Vec<RoundSnapshot>,
}

impl Continent {
    /// Run the full pipeline with the default point generator and partitioner
    pub fn generate(config: ContinentConfig) -> Result<Self> {
        ContinentPipeline::new(config).run()
    }

    /// Run the full pipeline with custom collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Continent configuration
    /// * `generator` - Produces the point set of each round
    /// * `partitioner` - Splits land into regions at the region round
    pub fn generate_with<G, P>(config: ContinentConfig, generator: G, partitioner: P) -> Result<Self>
    where
        G: PointGenerator,
        P: RegionPartitioner,
    {
        ContinentPipeline::with_collaborators(config, generator, partitioner).run()
    }

    #[inline]
    pub fn config(&self) -> &ContinentConfig {
        &self.config
    }

    /// The final round
    #[inline]
    pub fn last(&self) -> &RoundSnapshot {
        &self.last
    }

    /// Earlier rounds in order, empty unless `keep_history` was set
    #[inline]
    pub fn history(&self) -> &[RoundSnapshot] {
        &self.history
    }

    #[inline]
    pub fn graph(&self) -> &AdjacencyGraph {
        self.last.graph()
    }

    #[inline]
    pub fn water(&self) -> &WaterMask {
        &self.last.water
    }

    #[inline]
    pub fn regions(&self) -> Option<&RegionMask> {
        self.last.regions.as_ref()
    }
}

/// Round state machine with pluggable point generation and partitioning
pub struct ContinentPipeline<G = JitteredGrid, P = FloodRegionPartitioner> {
    config: ContinentConfig,
    generator: G,
    partitioner: P,
}

impl ContinentPipeline {
    /// Pipeline with a [`JitteredGrid`] and a [`FloodRegionPartitioner`]
    pub fn new(config: ContinentConfig) -> Self {
        Self::with_collaborators(config, JitteredGrid::default(), FloodRegionPartitioner)
    }
}

impl<G: PointGenerator, P: RegionPartitioner> ContinentPipeline<G, P> {
    pub fn with_collaborators(config: ContinentConfig, generator: G, partitioner: P) -> Self {
        Self {
            config,
            generator,
            partitioner,
        }
    }

    #[inline]
    pub fn config(&self) -> &ContinentConfig {
        &self.config
    }

    /// Iterate over the rounds one at a time
    ///
    /// Dropping the iterator between rounds cancels the run; the rounds
    /// computed so far remain available through [`Rounds::into_continent`].
    /// An invalid configuration is reported as the first item, before any
    /// round runs.
    pub fn rounds(&self) -> Rounds<'_, G, P> {
        Rounds {
            pipeline: self,
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            next_round: 1,
            current: None,
            history: Vec::new(),
            pending: self.config.validate().err(),
            failed: false,
        }
    }

    /// Run every round and return the finished continent
    pub fn run(&self) -> Result<Continent> {
        let mut rounds = self.rounds();
        for summary in rounds.by_ref() {
            summary?;
        }
        rounds.into_continent()
    }
}

/// Iterator over pipeline rounds, yielding one summary per finished round
///
/// After an error the iterator is exhausted.
pub struct Rounds<'p, G, P> {
    pipeline: &'p ContinentPipeline<G, P>,
    rng: ChaCha8Rng,
    next_round: usize,
    current: Option<RoundSnapshot>,
    history: Vec<RoundSnapshot>,
    pending: Option<CoastError>,
    failed: bool,
}

impl<G: PointGenerator, P: RegionPartitioner> Rounds<'_, G, P> {
    /// The most recently finished round
    #[inline]
    pub fn current(&self) -> Option<&RoundSnapshot> {
        self.current.as_ref()
    }

    /// Stop here and keep the rounds finished so far
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if no round has finished.
    pub fn into_continent(self) -> Result<Continent> {
        let last = self.current.ok_or_else(|| {
            CoastError::DegenerateInput("no round finished before the run stopped".to_string())
        })?;
        Ok(Continent {
            config: self.pipeline.config,
            last,
            history: self.history,
        })
    }
}

impl<G: PointGenerator, P: RegionPartitioner> Iterator for Rounds<'_, G, P> {
    type Item = Result<RoundSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            self.failed = true;
            return Some(Err(err));
        }
        let config = &self.pipeline.config;
        if self.failed || self.next_round > config.rounds {
            return None;
        }

        let round = self.next_round;
        let result = match self.current.as_ref() {
            None => seed_round(
                config,
                &self.pipeline.generator,
                &self.pipeline.partitioner,
                &mut self.rng,
            ),
            Some(previous) => refine_round(
                config,
                &self.pipeline.generator,
                &self.pipeline.partitioner,
                previous,
                round,
                &mut self.rng,
            ),
        };

        match result {
            Ok(snapshot) => {
                let summary = snapshot.summary();
                info!(
                    round,
                    stride = summary.stride,
                    points = summary.point_count,
                    land = summary.land_count,
                    erode_skips = summary.stats.erode_skips,
                    grow_skips = summary.stats.grow_skips,
                    "round complete"
                );
                if let Some(previous) = self.current.replace(snapshot) {
                    if config.keep_history {
                        self.history.push(previous);
                    }
                }
                self.next_round += 1;
                Some(Ok(summary))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Round 1: grow a blob from one random interior point
#[instrument(level = "debug", skip_all, fields(round = 1, stride = config.start_stride))]
fn seed_round<G, P>(
    config: &ContinentConfig,
    generator: &G,
    partitioner: &P,
    rng: &mut ChaCha8Rng,
) -> Result<RoundSnapshot>
where
    G: PointGenerator + ?Sized,
    P: RegionPartitioner + ?Sized,
{
    let schedule = &config.seed_schedule;
    let geometry = RoundGeometry::generate(generator, config.start_stride, config.raster_scale, rng)?;
    let count = geometry.point_count();
    let border = &geometry.border;
    let forbidden = border.union(&geometry.corner);

    let mut candidates: Vec<usize> = (0..count).filter(|&p| !forbidden.contains(p)).collect();
    if candidates.is_empty() {
        debug!("no point outside the corner zones, seeding anywhere off the border");
        candidates = (0..count).filter(|&p| !border.contains(p)).collect();
    }
    if candidates.is_empty() {
        return Err(CoastError::DegenerateInput(format!(
            "all {} points of stride {} lie on the border",
            count, config.start_stride
        )));
    }
    let start = candidates[rng.gen_range(0..candidates.len())];

    let mut water = WaterMask::all_water(count);
    water.set(start, false);
    let mut coast = Coastline::new(&geometry.graph, water)?;

    let target = ((schedule.land_fraction * (count - border.len()) as f32).round() as usize).max(1);
    let bounds = IslandBounds::from_fractions(count, schedule.small_island, schedule.large_island);
    debug!(start, target, ?bounds, "seed placed");

    let mut stats = RoundStats::default();
    for pass in 0..schedule.max_iterations {
        let land = coast.land_count();
        if land > 1 {
            let erode = (schedule.perturbation * land as f32).ceil() as usize;
            stats.erode_skips += coast.reduce_coastline(rng, erode);
        }
        let land = coast.land_count();
        if land < target {
            stats.grow_skips += coast.build_up_coastline(&forbidden, rng, target - land);
        }
        stats.add_clean(coast.clean(border, bounds));
        debug!(pass, land = coast.land_count(), "seed pass complete");
    }

    verify_coastline(config, &geometry, &coast)?;
    let water = coast.into_water();

    let regions = if config.region_round == 1 {
        Some(partition(config, partitioner, &geometry, &water, rng)?)
    } else {
        None
    };

    Ok(RoundSnapshot {
        round: 1,
        geometry,
        water,
        regions,
        stats,
    })
}

/// Round 2 and later: project the previous round and re-perturb its coast
#[instrument(level = "debug", skip_all, fields(round = round))]
fn refine_round<G, P>(
    config: &ContinentConfig,
    generator: &G,
    partitioner: &P,
    previous: &RoundSnapshot,
    round: usize,
    rng: &mut ChaCha8Rng,
) -> Result<RoundSnapshot>
where
    G: PointGenerator + ?Sized,
    P: RegionPartitioner + ?Sized,
{
    let schedule = &config.refine_schedule;
    let stride = config.next_stride(previous.stride());
    let geometry = RoundGeometry::generate(generator, stride, config.raster_scale, rng)?;
    let count = geometry.point_count();
    let border = &geometry.border;

    let old_field = &previous.geometry.field;
    let mut water = project_water(old_field, &previous.water, &geometry.points)?;
    let mut regions = previous
        .regions
        .as_ref()
        .map(|old| project_regions(old_field, old, &geometry.points))
        .transpose()?;
    for &point in border.members() {
        water.set(point, true);
        if let Some(regions) = regions.as_mut() {
            regions.set(point, RegionMask::UNASSIGNED);
        }
    }

    let mut coast = Coastline::new(&geometry.graph, water)?;
    let min_land = (schedule.min_land_fraction * (count - border.len()) as f32).ceil() as usize;
    let perturbation = schedule.perturbation(round);
    let iterations = schedule.iterations(round);
    let bounds = IslandBounds::from_fractions(count, schedule.small_island, schedule.large_island);
    debug!(
        stride,
        points = count,
        land = coast.land_count(),
        perturbation,
        iterations,
        "projected previous round"
    );

    let mut stats = RoundStats::default();
    for iteration in 0..iterations {
        let before = coast.land_count();
        let erode = (perturbation * before as f32).ceil() as usize;
        stats.erode_skips += coast.reduce_coastline(rng, erode);

        let goal = before.max(min_land);
        for _ in 0..=GROW_RETRY_PASSES {
            let missing = goal.saturating_sub(coast.land_count());
            if missing == 0 {
                break;
            }
            stats.grow_skips += coast.build_up_coastline(border, rng, missing);
        }

        stats.add_clean(coast.clean(border, bounds));
        debug!(iteration, land = coast.land_count(), "refine iteration complete");
    }

    verify_coastline(config, &geometry, &coast)?;
    let water = coast.into_water();

    if let Some(regions) = regions.as_mut() {
        reconcile_regions(&geometry.graph, &water, regions);
    } else if round == config.region_round {
        regions = Some(partition(config, partitioner, &geometry, &water, rng)?);
    }
    if let Some(regions) = regions.as_ref() {
        verify_regions(regions, &water)?;
    }

    Ok(RoundSnapshot {
        round,
        geometry,
        water,
        regions,
        stats,
    })
}

fn partition<P: RegionPartitioner + ?Sized>(
    config: &ContinentConfig,
    partitioner: &P,
    geometry: &RoundGeometry,
    water: &WaterMask,
    rng: &mut ChaCha8Rng,
) -> Result<RegionMask> {
    let regions = partitioner.partition(&geometry.graph, rng, config.region_count, water)?;
    if regions.len() != geometry.point_count() {
        return Err(CoastError::RegionPartition(format!(
            "partitioner returned {} ids for {} points",
            regions.len(),
            geometry.point_count()
        )));
    }
    verify_regions(&regions, water)?;
    debug!(regions = regions.max_region(), "land partitioned");
    Ok(regions)
}

/// Border water always; graph symmetry and frontier consistency in debug builds or on request
fn verify_coastline(config: &ContinentConfig, geometry: &RoundGeometry, coast: &Coastline<'_>) -> Result<()> {
    if cfg!(debug_assertions) || config.verify_rounds {
        geometry.graph.verify()?;
        coast.verify(&geometry.border)
    } else {
        coast.verify_border(&geometry.border)
    }
}

fn verify_regions(regions: &RegionMask, water: &WaterMask) -> Result<()> {
    match water
        .water_points()
        .find(|&p| regions.get(p) != RegionMask::UNASSIGNED)
    {
        Some(point) => Err(CoastError::InvariantViolation(format!(
            "water point {} carries region {}",
            point,
            regions.get(point)
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContinentConfigBuilder, RefineSchedule};
    use glam::Vec2;
    use rand::RngCore;
    use std::collections::VecDeque;

    fn small_config(seed: u64, rounds: usize) -> ContinentConfig {
        ContinentConfigBuilder::new()
            .seed(seed)
            .rounds(rounds)
            .unwrap()
            .verify_rounds(true)
            .keep_history(true)
            .build()
            .unwrap()
    }

    /// Every water point reachable from border water through water
    fn single_ocean(snapshot: &RoundSnapshot) -> bool {
        let graph = snapshot.graph();
        let water = &snapshot.water;
        let mut seen = vec![false; snapshot.point_count()];
        let mut queue: VecDeque<usize> = snapshot
            .border()
            .members()
            .iter()
            .copied()
            .filter(|&p| water.is_water(p))
            .collect();
        for &p in &queue {
            seen[p] = true;
        }
        while let Some(p) = queue.pop_front() {
            for &n in graph.neighbors(p) {
                if water.is_water(n) && !seen[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        water.water_points().all(|p| seen[p])
    }

    #[test]
    fn test_same_seed_same_continent() {
        let a = Continent::generate(small_config(99, 4)).unwrap();
        let b = Continent::generate(small_config(99, 4)).unwrap();
        assert_eq!(a.last().geometry.points, b.last().geometry.points);
        assert_eq!(a.water(), b.water());
        assert_eq!(a.regions(), b.regions());
        assert_eq!(a.last().stats, b.last().stats);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Continent::generate(small_config(1, 2)).unwrap();
        let b = Continent::generate(small_config(2, 2)).unwrap();
        assert_ne!(a.last().geometry.points, b.last().geometry.points);
    }

    #[test]
    fn test_stride_schedule_and_history() {
        let continent = Continent::generate(small_config(5, 4)).unwrap();
        let strides: Vec<usize> = continent
            .history()
            .iter()
            .chain(std::iter::once(continent.last()))
            .map(|s| s.stride())
            .collect();
        assert_eq!(strides, vec![6, 9, 14, 22]);
        assert_eq!(continent.last().point_count(), 22 * 22);
    }

    #[test]
    fn test_border_is_water_every_round() {
        let continent = Continent::generate(small_config(17, 4)).unwrap();
        for snapshot in continent.history().iter().chain(std::iter::once(continent.last())) {
            for &p in snapshot.border().members() {
                assert!(snapshot.water.is_water(p), "round {} border point {}", snapshot.round, p);
            }
        }
    }

    #[test]
    fn test_single_ocean_every_round() {
        let continent = Continent::generate(small_config(23, 4)).unwrap();
        for snapshot in continent.history().iter().chain(std::iter::once(continent.last())) {
            assert!(single_ocean(snapshot), "round {} has a lake", snapshot.round);
        }
    }

    #[test]
    fn test_secondary_islands_within_bounds() {
        let refine = RefineSchedule {
            large_island: 0.05,
            ..RefineSchedule::default()
        };
        let config = ContinentConfigBuilder::new()
            .seed(31)
            .rounds(4)
            .unwrap()
            .refine_schedule(refine)
            .unwrap()
            .keep_history(true)
            .build()
            .unwrap();
        let continent = Continent::generate(config).unwrap();

        for snapshot in continent.history()[1..].iter().chain(std::iter::once(continent.last())) {
            let coast = Coastline::new(snapshot.graph(), snapshot.water.clone()).unwrap();
            let bounds = IslandBounds::from_fractions(snapshot.point_count(), refine.small_island, refine.large_island);
            let oversized = coast
                .land_bodies()
                .iter()
                .filter(|body| body.len() > bounds.large)
                .count();
            assert!(oversized <= 1, "round {} kept {} oversized landmasses", snapshot.round, oversized);
        }
    }

    #[test]
    fn test_land_stays_above_floor_in_refine_rounds() {
        let continent = Continent::generate(small_config(3, 5)).unwrap();
        let schedule = continent.config().refine_schedule;

        for snapshot in continent.history()[1..].iter().chain(std::iter::once(continent.last())) {
            let points = snapshot.point_count();
            let non_border = points - snapshot.border().len();
            let min_land = (schedule.min_land_fraction * non_border as f32).ceil() as usize;
            // Island removal after regrowth may drown a few points below the floor
            let slack = snapshot.stats.islands_drowned + (schedule.small_island * points as f32).ceil() as usize;
            let land = snapshot.water.land_count();
            assert!(
                land + slack >= min_land,
                "round {}: land {} below floor {}",
                snapshot.round,
                land,
                min_land
            );
        }
    }

    #[test]
    fn test_hand_built_config_rejected_before_first_round() {
        let base = small_config(6, 4);
        let config = ContinentConfig {
            stride_multiplier: 0.5,
            ..base
        };
        let pipeline = ContinentPipeline::new(config);
        let mut rounds = pipeline.rounds();

        assert!(matches!(rounds.next(), Some(Err(CoastError::InvalidConfig(_)))));
        assert!(rounds.next().is_none());
        assert!(rounds.current().is_none());

        assert!(matches!(
            Continent::generate(config),
            Err(CoastError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_regions_partitioned_and_projected() {
        let config = ContinentConfigBuilder::new()
            .seed(11)
            .rounds(5)
            .unwrap()
            .region_round(3)
            .unwrap()
            .region_count(4)
            .unwrap()
            .keep_history(true)
            .build()
            .unwrap();
        let continent = Continent::generate(config).unwrap();

        let history = continent.history();
        assert!(history[0].regions.is_none());
        assert!(history[1].regions.is_none());
        assert!(history[2].regions.is_some());

        let regions = continent.regions().unwrap();
        let water = continent.water();
        assert_eq!(regions.len(), water.len());
        for p in 0..water.len() {
            let id = regions.get(p);
            if water.is_water(p) {
                assert_eq!(id, 0);
            } else {
                assert!(id <= 4);
            }
        }
        assert!(water.land_points().any(|p| regions.get(p) != 0));
    }

    #[test]
    fn test_no_regions_before_region_round() {
        let continent = Continent::generate(small_config(4, 3)).unwrap();
        assert!(continent.regions().is_none());
    }

    #[test]
    fn test_rounds_can_stop_early() {
        let pipeline = ContinentPipeline::new(small_config(8, 9));
        let mut rounds = pipeline.rounds();
        let first = rounds.next().unwrap().unwrap();
        let second = rounds.next().unwrap().unwrap();
        assert_eq!((first.round, first.stride), (1, 6));
        assert_eq!((second.round, second.stride), (2, 9));
        assert_eq!(rounds.current().unwrap().round, 2);

        let continent = rounds.into_continent().unwrap();
        assert_eq!(continent.last().round, 2);
        assert_eq!(continent.history().len(), 1);
    }

    #[test]
    fn test_stopping_before_any_round_fails() {
        let pipeline = ContinentPipeline::new(small_config(8, 2));
        assert!(matches!(
            pipeline.rounds().into_continent(),
            Err(CoastError::DegenerateInput(_))
        ));
    }

    struct NoPoints;

    impl PointGenerator for NoPoints {
        fn generate(&self, _stride: usize, _rng: &mut dyn RngCore) -> Vec<Vec2> {
            Vec::new()
        }
    }

    #[test]
    fn test_empty_point_set_is_degenerate() {
        let result = Continent::generate_with(small_config(1, 2), NoPoints, FloodRegionPartitioner);
        assert!(matches!(result, Err(CoastError::DegenerateInput(_))));
    }

    struct FailingPartitioner;

    impl RegionPartitioner for FailingPartitioner {
        fn partition(
            &self,
            _graph: &AdjacencyGraph,
            _rng: &mut dyn RngCore,
            _region_count: u32,
            _water: &WaterMask,
        ) -> Result<RegionMask> {
            Err(CoastError::RegionPartition("refused".to_string()))
        }
    }

    #[test]
    fn test_partitioner_error_stops_iteration() {
        let config = ContinentConfigBuilder::new()
            .seed(2)
            .rounds(4)
            .unwrap()
            .region_round(2)
            .unwrap()
            .build()
            .unwrap();
        let pipeline = ContinentPipeline::with_collaborators(config, JitteredGrid::default(), FailingPartitioner);
        let results: Vec<_> = pipeline.rounds().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(CoastError::RegionPartition(_))));
    }
}
