use super::*;

/// Dijkstra restricted to edges flagged for the region of the destination.
pub struct Server<'a> {
    graph: &'a FlaggedGraph,
}

impl<'a> Server<'a> {
    pub fn new(graph: &'a FlaggedGraph) -> Self {
        Server { graph }
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
            ZeroPotential(),
        )
    }
}
