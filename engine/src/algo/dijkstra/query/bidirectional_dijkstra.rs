use super::*;
use crate::algo::a_star::{Potential, ZeroPotential};

/// When a bidirectional search may stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingCriterion {
    /// Stop once the sum of both minimum queue keys reaches the tentative distance.
    /// Only valid without potentials.
    SumOfMinKeys,
    /// Stop once either minimum queue key reaches the tentative distance.
    /// Valid for consistent potentials, where keys are lower bounds of the total distance.
    EitherMinKey,
}

/// Callbacks and settings of one bidirectional query.
pub struct BidirectionalParams<FP, BP, FPot, BPot> {
    pub forward_edge_predicate: FP,
    pub backward_edge_predicate: BP,
    /// Lower bound towards the target, initialized with the target.
    pub forward_potential: FPot,
    /// Lower bound from the source, initialized with the source.
    pub backward_potential: BPot,
    pub stopping_criterion: StoppingCriterion,
    /// Do not queue a node in one direction if it was already settled by the other one.
    pub kwa_pruning: bool,
}

impl BidirectionalParams<fn(&HalfEdge) -> bool, fn(&HalfEdge) -> bool, ZeroPotential, ZeroPotential> {
    pub fn plain() -> Self {
        BidirectionalParams {
            forward_edge_predicate: |_| true,
            backward_edge_predicate: |_| true,
            forward_potential: ZeroPotential(),
            backward_potential: ZeroPotential(),
            stopping_criterion: StoppingCriterion::SumOfMinKeys,
            kwa_pruning: false,
        }
    }
}

/// Bidirectional search with one pop per direction in turn.
///
/// The forward search runs on `forward_graph` from `from`, the backward search on `backward_graph`
/// (the transpose) from `to`. Whenever a relaxation reaches a node with a finite tentative distance
/// from the other direction, the tentative distance `mu` and the meeting node are updated.
pub fn bidirectional_route<FG, BG, FA, BA, FP, BP, FPot, BPot>(
    forward_graph: &FG,
    backward_graph: &BG,
    from: NodeId,
    to: NodeId,
    collect_search_space: bool,
    params: BidirectionalParams<FP, BP, FPot, BPot>,
) -> Result<Route>
where
    FG: Adjacency<FA>,
    BG: Adjacency<BA>,
    FA: Arc,
    BA: Arc,
    FP: FnMut(&FA) -> bool,
    BP: FnMut(&BA) -> bool,
    FPot: Potential,
    BPot: Potential,
{
    forward_graph.check_node(from)?;
    forward_graph.check_node(to)?;
    backward_graph.check_node(from)?;
    backward_graph.check_node(to)?;

    let BidirectionalParams {
        mut forward_edge_predicate,
        mut backward_edge_predicate,
        mut forward_potential,
        mut backward_potential,
        stopping_criterion,
        kwa_pruning,
    } = params;

    forward_potential.init(to);
    backward_potential.init(from);

    let (forward_key, backward_key) = match (forward_potential.potential(from), backward_potential.potential(to)) {
        (Some(forward_key), Some(backward_key)) => (forward_key, backward_key),
        _ => return Ok(Route::unreachable(if collect_search_space { Some(Vec::new()) } else { None }, 0)),
    };

    let mut forward = DijkstraRun::new(forward_graph, from, forward_key, collect_search_space);
    let mut backward = DijkstraRun::new(backward_graph, to, backward_key, collect_search_space);

    let mut tentative_distance = INFINITY;
    let mut meeting_node = None;
    if from == to {
        tentative_distance = 0;
        meeting_node = Some(from);
    }

    let mut forward_turn = true;
    loop {
        let (forward_min, backward_min) = match (forward.min_key(), backward.min_key()) {
            (Some(forward_min), Some(backward_min)) => (forward_min, backward_min),
            _ => break,
        };
        if tentative_distance < INFINITY {
            let done = match stopping_criterion {
                StoppingCriterion::SumOfMinKeys => forward_min as u64 + backward_min as u64 >= tentative_distance as u64,
                StoppingCriterion::EitherMinKey => forward_min >= tentative_distance || backward_min >= tentative_distance,
            };
            if done {
                break;
            }
        }

        if forward_turn {
            let other = &backward;
            forward.settle_next_node(
                &mut forward_edge_predicate,
                |head, distance| {
                    let remaining = other.tentative_distance(head);
                    if remaining < INFINITY && distance + remaining < tentative_distance {
                        tentative_distance = distance + remaining;
                        meeting_node = Some(head);
                    }
                    !(kwa_pruning && other.is_settled(head))
                },
                |node| forward_potential.potential(node),
            );
        } else {
            let other = &forward;
            backward.settle_next_node(
                &mut backward_edge_predicate,
                |head, distance| {
                    let remaining = other.tentative_distance(head);
                    if remaining < INFINITY && distance + remaining < tentative_distance {
                        tentative_distance = distance + remaining;
                        meeting_node = Some(head);
                    }
                    !(kwa_pruning && other.is_settled(head))
                },
                |node| backward_potential.potential(node),
            );
        }
        forward_turn = !forward_turn;
    }

    let num_queue_pops = forward.num_queue_pops() + backward.num_queue_pops();
    let search_space = match (forward.take_search_space(), backward.take_search_space()) {
        (Some(mut forward_space), Some(backward_space)) => {
            forward_space.extend(backward_space);
            Some(forward_space)
        }
        _ => None,
    };

    match meeting_node {
        Some(meeting_node) => {
            let mut path = forward.node_path(from, meeting_node);
            let mut backward_path = backward.node_path(to, meeting_node);
            backward_path.reverse();
            path.extend(backward_path.into_iter().skip(1));
            Ok(Route::found(path, tentative_distance, search_space, num_queue_pops))
        }
        None => Ok(Route::unreachable(search_space, num_queue_pops)),
    }
}

/// Bidirectional Dijkstra, the backward search runs on the transposed graph.
pub struct Server<'a, G> {
    forward: &'a G,
    backward: OwnedGraph,
}

impl<'a, G: Adjacency<HalfEdge>> Server<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Server {
            forward: graph,
            backward: OwnedGraph::reversed(graph),
        }
    }
}

impl<'a, G: Adjacency<HalfEdge>> Router for Server<'a, G> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        bidirectional_route(self.forward, &self.backward, from, to, collect_search_space, BidirectionalParams::plain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_shortcut() -> OwnedGraph {
        // 0 - 1 - 2 - 3 - 4 with a long direct edge 0 -> 4
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 6]);
        for node in 0..4 {
            builder.add_undirected_edge(node, HalfEdge::new(node + 1, 2)).unwrap();
        }
        builder.add_edge(0, HalfEdge::new(4, 9)).unwrap();
        builder.into_first_out_graph()
    }

    #[test]
    fn does_not_stop_at_first_meeting() {
        let graph = line_with_shortcut();
        let server = Server::new(&graph);

        let route = server.route(0, 4, true).unwrap();
        assert_eq!(route.length, 8);
        assert_eq!(route.path, vec![0, 1, 2, 3, 4]);
        let search_space = route.search_space.unwrap();
        assert_eq!(search_space.len(), route.num_queue_pops);

        let back = server.route(4, 0, false).unwrap();
        assert_eq!(back.length, 8);
        assert_eq!(back.path, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn trivial_and_unreachable_queries() {
        let graph = line_with_shortcut();
        let server = Server::new(&graph);

        let trivial = server.route(2, 2, false).unwrap();
        assert_eq!(trivial.path, vec![2]);
        assert_eq!(trivial.length, 0);

        let unreachable = server.route(0, 5, false).unwrap();
        assert_eq!(unreachable.length, -1);
        assert!(unreachable.path.is_empty());

        assert!(server.route(0, 6, false).is_err());
    }
}
