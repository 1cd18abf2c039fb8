use super::*;
use crate::algo::a_star::{Potential, ZeroPotential};

/// Unidirectional search from `from` which stops as soon as `to` is settled.
/// Only edges accepted by `edge_predicate` are relaxed.
pub fn unidirectional_route<G, A, P>(
    graph: &G,
    from: NodeId,
    to: NodeId,
    collect_search_space: bool,
    mut edge_predicate: impl FnMut(&A) -> bool,
    mut potential: P,
) -> Result<Route>
where
    G: Adjacency<A>,
    A: Arc,
    P: Potential,
{
    graph.check_node(from)?;
    graph.check_node(to)?;
    potential.init(to);

    let initial_key = match potential.potential(from) {
        Some(key) => key,
        None => return Ok(Route::unreachable(if collect_search_space { Some(Vec::new()) } else { None }, 0)),
    };

    let mut dijkstra = DijkstraRun::new(graph, from, initial_key, collect_search_space);
    while let Some(node) = dijkstra.settle_next_node(&mut edge_predicate, |_, _| true, |node| potential.potential(node)) {
        if node == to {
            let distance = dijkstra.tentative_distance(to);
            let path = dijkstra.node_path(from, to);
            return Ok(Route::found(path, distance, dijkstra.take_search_space(), dijkstra.num_queue_pops()));
        }
    }

    Ok(Route::unreachable(dijkstra.take_search_space(), dijkstra.num_queue_pops()))
}

/// Plain Dijkstra without any speedup technique.
pub struct Server<'a, G> {
    graph: &'a G,
}

impl<'a, G: Adjacency<HalfEdge>> Server<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Server { graph }
    }

    pub fn one_to_all(&self, from: NodeId) -> Result<Vec<DijkstraItem>> {
        one_to_all(self.graph, from)
    }
}

impl<'a, G: Adjacency<HalfEdge>> Router for Server<'a, G> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        unidirectional_route(self.graph, from, to, collect_search_space, |_: &HalfEdge| true, ZeroPotential())
    }
}
