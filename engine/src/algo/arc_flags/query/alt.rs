use super::*;
use crate::algo::alt::{ALTPotential, LandmarkDistancesCollection};

/// ALT restricted to edges flagged for the region of the destination.
/// Landmarks are computed on the unflagged graph.
pub struct Server<'a> {
    graph: &'a FlaggedGraph,
    potential: ALTPotential<'a>,
}

impl<'a> Server<'a> {
    /// Fails if the landmark distances were computed for a graph of different size.
    pub fn new(graph: &'a FlaggedGraph, landmarks: &'a LandmarkDistancesCollection) -> Result<Self> {
        landmarks.check_graph(graph)?;
        Ok(Server {
            graph,
            potential: ALTPotential::forward(landmarks),
        })
    }
}

impl<'a> Router for Server<'a> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        let region = self.graph.partition(to)?;
        unidirectional_route(
            self.graph,
            from,
            to,
            collect_search_space,
            |edge: &FlaggedHalfEdge| edge.is_flagged(region),
            self.potential.clone(),
        )
    }
}
