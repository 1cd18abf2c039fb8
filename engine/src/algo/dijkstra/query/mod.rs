//! Query Server wrappers for the different dijkstra variants

use super::*;

pub mod bidirectional_dijkstra;
pub mod dijkstra;
pub mod sym_bidir_astar;
