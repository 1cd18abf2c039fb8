//! Arc flags: precomputed per region edge filters.
//!
//! An edge carries the flag of region `R` if it lies on some shortest path into `R`.
//! Queries toward a node of `R` may then ignore every edge without that flag.
//! Preprocessing needs a partitioned graph, see `algo::partitioning`.

use super::*;

pub mod preprocessing;
pub mod query;

pub use preprocessing::{boundary_nodes, compute_arc_flags, compute_bidirectional_arc_flags};

/// Default width of the preprocessing worker pool.
pub const DEFAULT_NUM_WORKERS: usize = 8;

/// Settings of the preprocessing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcFlagConfig {
    /// Number of worker threads running shortest path tree searches.
    pub num_workers: usize,
}

impl ArcFlagConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        ArcFlagConfig { num_workers }
    }
}

impl Default for ArcFlagConfig {
    /// `DEFAULT_NUM_WORKERS` unless overridden through `ARC_FLAG_WORKERS`.
    fn default() -> Self {
        let num_workers = std::env::var("ARC_FLAG_WORKERS")
            .ok()
            .and_then(|workers| workers.parse().ok())
            .unwrap_or(DEFAULT_NUM_WORKERS);
        ArcFlagConfig { num_workers }
    }
}
