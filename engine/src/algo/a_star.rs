//! Goal directed search with potentials.
//!
//! A potential is a lower bound of the remaining distance to the target.
//! All potentials here are consistent, so A* settles every node at most once.

use super::*;
use crate::algo::dijkstra::query::dijkstra::unidirectional_route;
use crate::geo::haversine;

pub trait Potential {
    fn init(&mut self, target: NodeId);
    /// `None` if the target is provably unreachable from `node`.
    fn potential(&mut self, node: NodeId) -> Option<Weight>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPotential();

impl Potential for ZeroPotential {
    fn init(&mut self, _target: NodeId) {}
    fn potential(&mut self, _node: NodeId) -> Option<Weight> {
        Some(0)
    }
}

/// Factor applied to the great circle distance so rounding never overestimates.
pub const GREAT_CIRCLE_SCALE: f64 = 0.9999;

/// Scaled and truncated great circle distance to the target.
/// Admissible if every edge weight is at least the great circle distance between its endpoints.
#[derive(Debug, Clone)]
pub struct GreatCirclePotential<'a> {
    nodes: &'a [Node],
    target: Node,
}

impl<'a> GreatCirclePotential<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        GreatCirclePotential { nodes, target: Node::default() }
    }
}

impl<'a> Potential for GreatCirclePotential<'a> {
    fn init(&mut self, target: NodeId) {
        self.target = self.nodes[target as usize];
    }

    fn potential(&mut self, node: NodeId) -> Option<Weight> {
        Some((haversine(&self.nodes[node as usize], &self.target) * GREAT_CIRCLE_SCALE) as Weight)
    }
}

/// A* with an arbitrary potential. Each query works on a fresh clone of the prototype potential.
pub struct Server<'a, G, P> {
    graph: &'a G,
    potential: P,
}

impl<'a, G: Adjacency<HalfEdge>> Server<'a, G, GreatCirclePotential<'a>> {
    pub fn new(graph: &'a G) -> Self {
        Server {
            graph,
            potential: GreatCirclePotential::new(graph.nodes()),
        }
    }
}

impl<'a, G: Adjacency<HalfEdge>, P: Potential + Clone> Server<'a, G, P> {
    pub fn with_potential(graph: &'a G, potential: P) -> Self {
        Server { graph, potential }
    }
}

impl<'a, G: Adjacency<HalfEdge>, P: Potential + Clone> Router for Server<'a, G, P> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        unidirectional_route(self.graph, from, to, collect_search_space, |_: &HalfEdge| true, self.potential.clone())
    }
}
