//! Multi-resolution coastline and region synthesis
//!
//! A standalone library for growing continent-shaped land masks over planar
//! Voronoi-like point sets on the unit square. Each resolution round works
//! on a denser jittered grid, inherits the previous round's shape by nearest
//! ancestor projection, and perturbs the coastline with degree-weighted
//! erosion and growth so that capes and peninsulas gain fractal detail.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use continent_coast::*;
//!
//! let config = ContinentConfigBuilder::new()
//!     .seed(42)
//!     .rounds(6).unwrap()
//!     .region_count(5).unwrap()
//!     .build().unwrap();
//!
//! let continent = Continent::generate(config).unwrap();
//!
//! let water = continent.water();
//! println!("{} of {} points are land", water.land_count(), water.len());
//! if let Some(regions) = continent.regions() {
//!     println!("region sizes: {:?}", regions.region_sizes());
//! }
//! ```
//!
//! # Features
//!
//! - `parallel` (default): [`generate_many`] spreads independent runs over rayon
//! - `serde`: Enables serialization support for configuration and masks

// Modules
pub mod error;
pub mod config;
pub mod spatial;
pub mod mask;
pub mod generation;
pub mod coastline;
pub mod regions;
pub mod projection;
pub mod pipeline;
pub mod batch;

// Re-export core types for convenience
pub use error::{CoastError, Result};
pub use config::{ContinentConfig, ContinentConfigBuilder, RefineSchedule, SeedSchedule, MAX_ROUNDS};
pub use spatial::SpatialIndex;
pub use mask::{PointSet, RegionMask, WaterMask};
pub use generation::{AdjacencyGraph, JitteredGrid, PointGenerator, ProximityField, RoundGeometry};
pub use coastline::{CleanReport, Coastline, FrontierIndex, IslandBounds};
pub use regions::{reconcile_regions, FloodRegionPartitioner, RegionPartitioner};
pub use pipeline::{
    Continent, ContinentPipeline, RoundSnapshot, RoundStats, RoundSummary, Rounds, GROW_RETRY_PASSES,
};
pub use batch::generate_many;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
