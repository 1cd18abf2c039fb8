//! ALT: A*, Landmarks and Triangle inequality.
//!
//! For every landmark `L` the distances from and to all nodes are precomputed.
//! By the triangle inequality `d(L,t) - d(L,n)` and `d(n,L) - d(t,L)` are lower bounds of `d(n,t)`.

use super::*;
use crate::algo::{
    a_star::{self, Potential},
    dijkstra::{self, query::sym_bidir_astar, DijkstraRun},
};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Distances from and to one landmark for every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDistances {
    pub landmark: NodeId,
    /// `d(landmark, node)`, `INFINITY` if unreachable.
    pub from_landmark: Vec<Weight>,
    /// `d(node, landmark)`, `INFINITY` if unreachable.
    pub to_landmark: Vec<Weight>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkDistancesCollection {
    landmarks: Vec<LandmarkDistances>,
}

/// `minuend - subtrahend` as a distance bound.
/// `None` if the infinite minuend proves unreachability, zero if the bound carries no information.
#[inline]
fn landmark_bound(minuend: Weight, subtrahend: Weight) -> Option<Weight> {
    if minuend >= INFINITY {
        if subtrahend < INFINITY {
            None
        } else {
            Some(0)
        }
    } else {
        Some(minuend.saturating_sub(subtrahend))
    }
}

impl LandmarkDistancesCollection {
    pub fn new(landmarks: Vec<LandmarkDistances>) -> Self {
        LandmarkDistancesCollection { landmarks }
    }

    pub fn landmarks(&self) -> &[LandmarkDistances] {
        &self.landmarks
    }

    pub fn landmark_ids(&self) -> Vec<NodeId> {
        self.landmarks.iter().map(|l| l.landmark).collect()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Fails unless every landmark has one distance per node of `graph`.
    pub fn check_graph<G: Graph>(&self, graph: &G) -> Result<()> {
        for l in &self.landmarks {
            if l.from_landmark.len() != graph.num_nodes() || l.to_landmark.len() != graph.num_nodes() {
                return Err(Error::MalformedGraph(format!(
                    "distances of landmark {} do not match a graph with {} nodes",
                    l.landmark,
                    graph.num_nodes()
                )));
            }
        }
        Ok(())
    }

    /// Lower bound of `d(from, to)`, `None` if `to` is provably unreachable from `from`.
    /// Never negative and zero for `from == to`.
    pub fn lower_bound(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        let mut max: Weight = 0;
        for l in &self.landmarks {
            let (from, to) = (from as usize, to as usize);
            max = max.max(landmark_bound(l.from_landmark[to], l.from_landmark[from])?);
            max = max.max(landmark_bound(l.to_landmark[from], l.to_landmark[to])?);
        }
        Some(max)
    }
}

/// Run one forward and one backward one-to-all search per landmark, in parallel.
pub fn precompute_landmarks<G>(graph: &G, landmarks: &[NodeId]) -> Result<LandmarkDistancesCollection>
where
    G: Adjacency<HalfEdge> + Sync,
{
    for &landmark in landmarks {
        graph.check_node(landmark)?;
    }
    let reversed = OwnedGraph::reversed(graph);

    let landmarks = landmarks
        .par_iter()
        .map(|&landmark| {
            let from_landmark = dijkstra::one_to_all(graph, landmark)?.into_iter().map(|item| item.distance).collect();
            let to_landmark = dijkstra::one_to_all(&reversed, landmark)?.into_iter().map(|item| item.distance).collect();
            Ok(LandmarkDistances {
                landmark,
                from_landmark,
                to_landmark,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LandmarkDistancesCollection { landmarks })
}

/// Greedy farthest landmark selection.
/// Every new landmark is the last node settled by a search from all previous landmarks.
pub fn farthest_landmarks<G: Adjacency<HalfEdge>>(graph: &G, num_landmarks: usize, initial_landmark: NodeId) -> Result<Vec<NodeId>> {
    graph.check_node(initial_landmark)?;
    let mut landmarks: Vec<NodeId> = Vec::with_capacity(num_landmarks);
    let mut sources = vec![initial_landmark];

    while landmarks.len() < num_landmarks {
        let mut dijkstra = DijkstraRun::new(graph, sources[0], 0, false);
        for &source in &sources[1..] {
            dijkstra.add_source(source, 0);
        }
        let mut last_node = sources[0];
        while let Some(node) = dijkstra.settle_next_node(|_: &HalfEdge| true, |_, _| true, |_| Some(0)) {
            last_node = node;
        }

        if landmarks.contains(&last_node) {
            break;
        }
        landmarks.push(last_node);
        sources = landmarks.clone();
    }

    Ok(landmarks)
}

/// Uniformly sampled distinct landmarks.
pub fn random_landmarks(num_nodes: usize, num_landmarks: usize, rng: &mut impl Rng) -> Vec<NodeId> {
    rand::seq::index::sample(rng, num_nodes, num_landmarks.min(num_nodes))
        .into_iter()
        .map(|node| node as NodeId)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Bound of `d(node, target)`
    Forward,
    /// Bound of `d(source, node)`
    Backward,
}

/// ALT potential over a precomputed landmark collection.
#[derive(Debug, Clone)]
pub struct ALTPotential<'a> {
    landmarks: &'a LandmarkDistancesCollection,
    direction: Direction,
    // distances from and to every landmark of the node passed to `init`
    anchor: Vec<(Weight, Weight)>,
}

impl<'a> ALTPotential<'a> {
    /// Lower bounds towards the target, for forward searches.
    pub fn forward(landmarks: &'a LandmarkDistancesCollection) -> Self {
        Self::new(landmarks, Direction::Forward)
    }

    /// Lower bounds from the source, for backward searches on the transposed graph.
    pub fn backward(landmarks: &'a LandmarkDistancesCollection) -> Self {
        Self::new(landmarks, Direction::Backward)
    }

    fn new(landmarks: &'a LandmarkDistancesCollection, direction: Direction) -> Self {
        ALTPotential {
            landmarks,
            direction,
            anchor: Vec::with_capacity(landmarks.len()),
        }
    }
}

impl<'a> Potential for ALTPotential<'a> {
    fn init(&mut self, target: NodeId) {
        self.anchor.clear();
        self.anchor.extend(
            self.landmarks
                .landmarks
                .iter()
                .map(|l| (l.from_landmark[target as usize], l.to_landmark[target as usize])),
        );
    }

    fn potential(&mut self, node: NodeId) -> Option<Weight> {
        let mut max: Weight = 0;
        for (l, &(anchor_from, anchor_to)) in self.landmarks.landmarks.iter().zip(&self.anchor) {
            let node_from = l.from_landmark[node as usize];
            let node_to = l.to_landmark[node as usize];
            let (a, b) = match self.direction {
                Direction::Forward => (landmark_bound(anchor_from, node_from)?, landmark_bound(node_to, anchor_to)?),
                Direction::Backward => (landmark_bound(node_from, anchor_from)?, landmark_bound(anchor_to, node_to)?),
            };
            max = max.max(a).max(b);
        }
        Some(max)
    }
}

/// Unidirectional A* with the ALT potential.
pub struct Server<'a, G>(a_star::Server<'a, G, ALTPotential<'a>>);

impl<'a, G: Adjacency<HalfEdge>> Server<'a, G> {
    /// Fails if the landmark distances were computed for a graph of different size.
    pub fn new(graph: &'a G, landmarks: &'a LandmarkDistancesCollection) -> Result<Self> {
        landmarks.check_graph(graph)?;
        Ok(Server(a_star::Server::with_potential(graph, ALTPotential::forward(landmarks))))
    }
}

impl<'a, G: Adjacency<HalfEdge>> Router for Server<'a, G> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        self.0.route(from, to, collect_search_space)
    }
}

/// Bidirectional ALT with symmetric potentials, Kwa pruning enabled by default.
pub struct BidirectionalServer<'a, G>(sym_bidir_astar::Server<'a, G, ALTPotential<'a>, ALTPotential<'a>>);

impl<'a, G: Adjacency<HalfEdge>> BidirectionalServer<'a, G> {
    pub fn new(graph: &'a G, landmarks: &'a LandmarkDistancesCollection) -> Result<Self> {
        landmarks.check_graph(graph)?;
        Ok(BidirectionalServer(sym_bidir_astar::Server::with_potentials(
            graph,
            ALTPotential::forward(landmarks),
            ALTPotential::backward(landmarks),
        )))
    }

    pub fn with_kwa_pruning(self, kwa_pruning: bool) -> Self {
        BidirectionalServer(self.0.with_kwa_pruning(kwa_pruning))
    }
}

impl<'a, G: Adjacency<HalfEdge>> Router for BidirectionalServer<'a, G> {
    fn route(&self, from: NodeId, to: NodeId, collect_search_space: bool) -> Result<Route> {
        self.0.route(from, to, collect_search_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    //
    //    0 --3--> 1 --1--> 2
    //    ^        |        |
    //    4        2        1
    //    |        v        v
    //    5        4 <--1-- 3
    //
    fn example_graph() -> OwnedGraph {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 6]);
        builder.add_edge(0, HalfEdge::new(1, 3)).unwrap();
        builder.add_edge(1, HalfEdge::new(2, 1)).unwrap();
        builder.add_edge(1, HalfEdge::new(4, 2)).unwrap();
        builder.add_edge(2, HalfEdge::new(3, 1)).unwrap();
        builder.add_edge(3, HalfEdge::new(4, 1)).unwrap();
        builder.add_edge(5, HalfEdge::new(0, 4)).unwrap();
        builder.into_first_out_graph()
    }

    #[test]
    fn bounds_are_admissible() {
        let graph = example_graph();
        let landmarks = precompute_landmarks(&graph, &[0, 4]).unwrap();
        assert_eq!(landmarks.landmark_ids(), vec![0, 4]);

        for from in 0..6 {
            let exact = dijkstra::one_to_all(&graph, from).unwrap();
            for to in 0..6 {
                match landmarks.lower_bound(from, to) {
                    Some(bound) => assert!(bound <= exact[to as usize].distance, "{} -> {}", from, to),
                    None => assert_eq!(exact[to as usize].distance, INFINITY),
                }
            }
            assert_eq!(landmarks.lower_bound(from, from), Some(0));
        }
        // 4 has no outgoing edges but 0 reaches landmark 4
        assert_eq!(landmarks.lower_bound(4, 0), None);
    }

    #[test]
    fn potentials_agree_with_lower_bound() {
        let graph = example_graph();
        let landmarks = precompute_landmarks(&graph, &[2, 5]).unwrap();
        let mut forward = ALTPotential::forward(&landmarks);
        let mut backward = ALTPotential::backward(&landmarks);
        forward.init(4);
        backward.init(5);
        for node in 0..6 {
            assert_eq!(forward.potential(node), landmarks.lower_bound(node, 4));
            assert_eq!(backward.potential(node), landmarks.lower_bound(5, node));
        }
    }

    #[test]
    fn landmark_selection() {
        let graph = example_graph();
        let farthest = farthest_landmarks(&graph, 2, 5).unwrap();
        assert_eq!(farthest[0], 4);
        assert_eq!(farthest.len(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        let mut random = random_landmarks(6, 4, &mut rng);
        assert_eq!(random.len(), 4);
        random.sort_unstable();
        random.dedup();
        assert_eq!(random.len(), 4);
        assert_eq!(random_landmarks(3, 10, &mut rng).len(), 3);
    }

    #[test]
    fn out_of_range_landmarks_are_rejected() {
        let graph = example_graph();
        assert!(precompute_landmarks(&graph, &[6]).is_err());

        let landmarks = precompute_landmarks(&graph, &[0]).unwrap();
        let smaller = AdjacencyListGraph::<HalfEdge>::with_nodes(vec![Node::default(); 5]).into_first_out_graph();
        assert!(Server::new(&smaller, &landmarks).is_err());
        assert!(BidirectionalServer::new(&graph, &landmarks).is_ok());
    }

    #[test]
    fn alt_servers_find_shortest_paths() {
        let graph = example_graph();
        let landmarks = precompute_landmarks(&graph, &[2]).unwrap();
        let unidirectional = Server::new(&graph, &landmarks).unwrap();
        let bidirectional = BidirectionalServer::new(&graph, &landmarks).unwrap();

        let route = unidirectional.route(5, 4, false).unwrap();
        assert_eq!(route.path, vec![5, 0, 1, 4]);
        assert_eq!(route.length, 9);
        assert_eq!(bidirectional.route(5, 4, false).unwrap().length, 9);
        assert_eq!(bidirectional.route(4, 5, false).unwrap().length, -1);
    }
}
