//! Building blocks for fast routing algorithms.
//!
//! Every query algorithm implements the `Router` trait, so callers can swap strategies without changing their code.
//! Routers only hold shared references to preprocessed data and allocate their search state per query,
//! so one router can serve many threads at once.

use crate::datastr::graph::*;
use crate::error::{Error, Result};
use serde::Serialize;

pub mod a_star;
pub mod alt;
pub mod arc_flags;
pub mod dijkstra;
pub mod partitioning;
pub mod shortest_path_tree;

/// Simply a source-target pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub from: NodeId,
    pub to: NodeId,
}

/// Result of a single routing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Nodes from origin to destination, empty if unreachable.
    pub path: Vec<NodeId>,
    /// Total weight of `path`, -1 if the destination is unreachable.
    pub length: i64,
    /// Settled nodes in settle order, only collected on request.
    pub search_space: Option<Vec<NodeId>>,
    pub num_queue_pops: usize,
}

impl Route {
    pub(crate) fn found(path: Vec<NodeId>, distance: Weight, search_space: Option<Vec<NodeId>>, num_queue_pops: usize) -> Self {
        Route {
            path,
            length: distance as i64,
            search_space,
            num_queue_pops,
        }
    }

    pub(crate) fn unreachable(search_space: Option<Vec<NodeId>>, num_queue_pops: usize) -> Self {
        Route {
            path: Vec::new(),
            length: -1,
            search_space,
            num_queue_pops,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.length >= 0
    }
}

/// Common interface of all shortest path query algorithms.
pub trait Router {
    /// Compute a shortest path from `from` to `to`.
    /// Fails for node ids outside of the graph. An unreachable destination is not an error.
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route>;

    /// `route` without collecting the search space.
    fn query(&self, query: Query) -> Result<Route> {
        self.route(query.from, query.to, false)
    }
}

impl<R: Router + ?Sized> Router for &R {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        (**self).route(from, to, collect_search_space)
    }
}

impl<R: Router + ?Sized> Router for Box<R> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        (**self).route(from, to, collect_search_space)
    }
}
