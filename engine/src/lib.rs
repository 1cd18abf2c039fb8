//! Shortest paths on static ocean graphs.
//!
//! Plain, bidirectional and goal directed Dijkstra variants, ALT with landmark preprocessing
//! and arc flags over a partitioned graph, all behind the common `algo::Router` interface.

#[macro_use]
pub mod report;
pub mod algo;
pub mod cli;
pub mod datastr;
pub mod error;
pub mod experiments;
pub mod geo;
pub mod io;

pub use error::{Error, Result};
