//! Error types for coastline synthesis

use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline
///
/// A random pick that finds nothing to do is never an error; the grower
/// reports it as a skip count instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoastError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input is too small or empty to run a round (zero points, empty raster, no seed cell)
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A structural invariant was broken (asymmetric adjacency, frontier drift, land on the border)
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The region partitioner could not produce a mask
    #[error("region partition failed: {0}")]
    RegionPartition(String),
}

/// Result type alias for coastline operations
pub type Result<T> = std::result::Result<T, CoastError>;
