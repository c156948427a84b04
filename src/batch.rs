//! Independent pipeline runs over many seeds
//!
//! Each run owns its RNG and every structure it builds, so runs share
//! nothing but the read-only configuration. With the `parallel` feature the
//! runs are spread over the rayon thread pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::config::ContinentConfig;
use crate::error::Result;
use crate::pipeline::Continent;

/// Generate one continent per seed, results in seed order
///
/// `config.seed` is ignored; every other setting applies to all runs.
///
/// # Example
///
/// ```
/// use continent_coast::*;
///
/// let config = ContinentConfigBuilder::new()
///     .rounds(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let continents = generate_many(&config, &[1, 2, 3]);
/// assert_eq!(continents.len(), 3);
/// assert_eq!(continents[1].as_ref().unwrap().config().seed, 2);
/// ```
pub fn generate_many(config: &ContinentConfig, seeds: &[u64]) -> Vec<Result<Continent>> {
    info!(runs = seeds.len(), "generating continents");
    let run = |&seed: &u64| Continent::generate(ContinentConfig { seed, ..*config });

    #[cfg(feature = "parallel")]
    let continents = seeds.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let continents = seeds.iter().map(run).collect();

    continents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContinentConfigBuilder;

    #[test]
    fn test_batch_matches_single_runs() {
        let config = ContinentConfigBuilder::new()
            .seed(0)
            .rounds(3)
            .unwrap()
            .build()
            .unwrap();
        let seeds = [5, 6, 7, 5];
        let batch = generate_many(&config, &seeds);
        assert_eq!(batch.len(), seeds.len());

        for (continent, &seed) in batch.iter().zip(&seeds) {
            let continent = continent.as_ref().unwrap();
            let single = Continent::generate(ContinentConfig { seed, ..config }).unwrap();
            assert_eq!(continent.config().seed, seed);
            assert_eq!(continent.water(), single.water());
        }
    }

    #[test]
    fn test_invalid_config_fails_every_run() {
        let config = ContinentConfig {
            raster_scale: 1,
            ..ContinentConfigBuilder::new().seed(1).build().unwrap()
        };
        let batch = generate_many(&config, &[1, 2]);
        assert!(batch
            .iter()
            .all(|result| matches!(result, Err(crate::error::CoastError::InvalidConfig(_)))));
    }

    #[test]
    fn test_empty_batch() {
        let config = ContinentConfigBuilder::new().seed(1).build().unwrap();
        assert!(generate_many(&config, &[]).is_empty());
    }
}
