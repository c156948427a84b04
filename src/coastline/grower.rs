//! Degree-weighted coastline erosion and growth
//!
//! Both primitives sample frontier points with
//! [`FrontierIndex::pick_weighted`](super::FrontierIndex::pick_weighted),
//! which favours capes and narrow peninsulas and yields fractal rather than
//! smooth or noisy coastlines. An attempt that finds nothing to do counts as
//! a skip; callers compare skips with the requested iterations to detect a
//! stalled phase.

use rand::Rng;
use tracing::{trace, warn};

use super::Coastline;
use crate::mask::PointSet;

impl Coastline<'_> {
    /// Erode: turn `iterations` weighted frontier points into water
    ///
    /// An attempt is skipped when the frontier is empty. Returns the skip count.
    pub fn reduce_coastline<R: Rng + ?Sized>(&mut self, rng: &mut R, iterations: usize) -> usize {
        let mut skips = 0;
        for _ in 0..iterations {
            let Some(point) = self.frontier.pick_weighted(rng) else {
                skips += 1;
                continue;
            };
            self.set_water(point, true);
        }
        report_stall("reduce_coastline", skips, iterations);
        skips
    }

    /// Grow: claim one water neighbour of a weighted frontier point per attempt
    ///
    /// An attempt is skipped when the frontier is empty, when the picked
    /// coastal point has no water neighbour, or when the chosen water
    /// neighbour is in `forbidden` (the tile border must stay water).
    /// Returns the skip count.
    pub fn build_up_coastline<R: Rng + ?Sized>(
        &mut self,
        forbidden: &PointSet,
        rng: &mut R,
        iterations: usize,
    ) -> usize {
        let mut skips = 0;
        let mut adjacent_water = Vec::new();
        for _ in 0..iterations {
            let Some(coast) = self.frontier.pick_weighted(rng) else {
                skips += 1;
                continue;
            };

            adjacent_water.clear();
            adjacent_water.extend(
                self.graph
                    .neighbors(coast)
                    .iter()
                    .copied()
                    .filter(|&n| self.water.is_water(n)),
            );
            if adjacent_water.is_empty() {
                skips += 1;
                continue;
            }

            let pick = adjacent_water[rng.gen_range(0..adjacent_water.len())];
            if forbidden.contains(pick) {
                trace!(point = pick, "growth blocked by border");
                skips += 1;
                continue;
            }
            self.set_water(pick, false);
        }
        report_stall("build_up_coastline", skips, iterations);
        skips
    }
}

fn report_stall(phase: &str, skips: usize, iterations: usize) {
    if iterations > 0 && skips == iterations {
        warn!(phase, iterations, "coastline phase stalled: every attempt skipped");
    }
}
