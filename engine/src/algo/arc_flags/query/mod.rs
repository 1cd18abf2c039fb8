//! Query servers which only relax edges flagged for the region of the destination.

use super::*;
use crate::algo::a_star::ZeroPotential;
use crate::algo::dijkstra::query::dijkstra::unidirectional_route;

pub mod alt;
pub mod bidirectional;
pub mod dijkstra;
