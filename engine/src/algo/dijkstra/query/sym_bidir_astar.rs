//! Bidirectional A* with the symmetric stopping criterion.
//!
//! The forward search uses a lower bound towards the target, the backward search a lower bound from the source.
//! The search stops as soon as one of the minimum queue keys reaches the tentative distance,
//! which is sound for consistent potentials (Pohl, 1971).

use super::*;
use crate::algo::a_star::{GreatCirclePotential, Potential};
use super::bidirectional_dijkstra::{bidirectional_route, BidirectionalParams, StoppingCriterion};

pub struct Server<'a, G, FPot, BPot> {
    forward: &'a G,
    backward: OwnedGraph,
    forward_potential: FPot,
    backward_potential: BPot,
    kwa_pruning: bool,
}

impl<'a, G: Adjacency<HalfEdge>> Server<'a, G, GreatCirclePotential<'a>, GreatCirclePotential<'a>> {
    /// Bidirectional A* with great circle potentials in both directions.
    pub fn new(graph: &'a G) -> Self {
        Self::with_potentials(graph, GreatCirclePotential::new(graph.nodes()), GreatCirclePotential::new(graph.nodes()))
    }
}

impl<'a, G, FPot, BPot> Server<'a, G, FPot, BPot>
where
    G: Adjacency<HalfEdge>,
    FPot: Potential + Clone,
    BPot: Potential + Clone,
{
    /// `backward_potential` is initialized with the source of each query and has to bound distances from there.
    pub fn with_potentials(graph: &'a G, forward_potential: FPot, backward_potential: BPot) -> Self {
        Server {
            forward: graph,
            backward: OwnedGraph::reversed(graph),
            forward_potential,
            backward_potential,
            kwa_pruning: true,
        }
    }

    pub fn with_kwa_pruning(mut self, kwa_pruning: bool) -> Self {
        self.kwa_pruning = kwa_pruning;
        self
    }
}

impl<'a, G, FPot, BPot> Router for Server<'a, G, FPot, BPot>
where
    G: Adjacency<HalfEdge>,
    FPot: Potential + Clone,
    BPot: Potential + Clone,
{
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        bidirectional_route(
            self.forward,
            &self.backward,
            from,
            to,
            collect_search_space,
            BidirectionalParams {
                forward_edge_predicate: |_: &HalfEdge| true,
                backward_edge_predicate: |_: &HalfEdge| true,
                forward_potential: self.forward_potential.clone(),
                backward_potential: self.backward_potential.clone(),
                stopping_criterion: StoppingCriterion::EitherMinKey,
                kwa_pruning: self.kwa_pruning,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine;

    #[test]
    fn matches_dijkstra_with_and_without_pruning() {
        let nodes: Vec<Node> = (0..16).map(|i| Node::new((i / 4) as f64, (i % 4) as f64)).collect();
        let mut builder = AdjacencyListGraph::with_nodes(nodes.clone());
        for a in 0..16u32 {
            for b in [a + 1, a + 4, a + 5] {
                if b < 16 && (b % 4 != 0 || b == a + 4) {
                    let weight = haversine(&nodes[a as usize], &nodes[b as usize]).ceil() as Weight + (a * 7 + b) % 5 * 5000;
                    builder.add_undirected_edge(a, HalfEdge::new(b, weight)).unwrap();
                }
            }
        }
        let graph = builder.into_first_out_graph();
        let dijkstra = super::super::dijkstra::Server::new(&graph);
        let pruned = Server::new(&graph);
        let unpruned = Server::new(&graph).with_kwa_pruning(false);

        for from in 0..16 {
            for to in 0..16 {
                let expected = dijkstra.route(from, to, false).unwrap();
                for server in [&pruned, &unpruned] {
                    let route = server.route(from, to, false).unwrap();
                    assert_eq!(route.length, expected.length, "{} -> {}", from, to);
                    assert_eq!(route.path.first(), Some(&from));
                    assert_eq!(route.path.last(), Some(&to));
                }
            }
        }
    }
}
