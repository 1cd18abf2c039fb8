use super::*;
use crate::algo::dijkstra::query::bidirectional_dijkstra::{bidirectional_route, BidirectionalParams, StoppingCriterion};

/// Bidirectional Dijkstra on arc flags.
///
/// The forward search only uses edges flagged for the region of the destination,
/// the backward search runs on the transpose and only uses edges flagged there for the region of the origin.
/// The transpose needs flags of its own, see `compute_bidirectional_arc_flags`.
pub struct Server<'a> {
    forward: &'a FlaggedGraph,
    backward: &'a FlaggedGraph,
}

impl<'a> Server<'a> {
    /// Fails if the two graphs do not have the same nodes.
    pub fn new(forward: &'a FlaggedGraph, backward: &'a FlaggedGraph) -> Result<Self> {
        if forward.num_nodes() != backward.num_nodes() || forward.num_arcs() != backward.num_arcs() {
            return Err(Error::MalformedGraph(format!(
                "forward graph has {} nodes and {} edges, backward graph {} nodes and {} edges",
                forward.num_nodes(),
                forward.num_arcs(),
                backward.num_nodes(),
                backward.num_arcs()
            )));
        }
        Ok(Server { forward, backward })
    }
}

impl<'a> Router for Server<'a> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        let forward_region = self.forward.partition(to)?;
        let backward_region = self.backward.partition(from)?;
        bidirectional_route(
            self.forward,
            self.backward,
            from,
            to,
            collect_search_space,
            BidirectionalParams {
                forward_edge_predicate: |edge: &FlaggedHalfEdge| edge.is_flagged(forward_region),
                backward_edge_predicate: |edge: &FlaggedHalfEdge| edge.is_flagged(backward_region),
                forward_potential: ZeroPotential(),
                backward_potential: ZeroPotential(),
                stopping_criterion: StoppingCriterion::SumOfMinKeys,
                kwa_pruning: false,
            },
        )
    }
}
