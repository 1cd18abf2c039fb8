//! Query-time graph in CSR layout.
//!
//! All outgoing edges of all nodes live in one contiguous array.
//! The edges of node `i` are `edges[first_out[i]..first_out[i + 1]]`.

use super::*;
use std::ops::Range;

/// Immutable adjacency array graph, generic over the edge payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOutGraph<A = HalfEdge> {
    nodes: Vec<Node>,
    first_out: Vec<EdgeId>,
    edges: Vec<A>,
}

pub type OwnedGraph = FirstOutGraph<HalfEdge>;

/// A transposed graph which remembers for every reversed edge the id of the edge it was created from.
#[derive(Debug, Clone)]
pub struct ReversedGraphWithEdgeIds<A = HalfEdge> {
    pub graph: FirstOutGraph<A>,
    pub original_edge_ids: Vec<EdgeId>,
}

impl<A: Arc> FirstOutGraph<A> {
    /// Create a new `FirstOutGraph` from the three containers.
    /// Fails if the offsets are inconsistent or an edge points to a non existing node.
    pub fn new(nodes: Vec<Node>, first_out: Vec<EdgeId>, edges: Vec<A>) -> Result<Self> {
        if first_out.len() != nodes.len() + 1 {
            return Err(Error::MalformedGraph(format!(
                "first_out has {} entries but there are {} nodes",
                first_out.len(),
                nodes.len()
            )));
        }
        if first_out[0] != 0 || first_out.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::MalformedGraph("first_out must start at 0 and be non decreasing".to_string()));
        }
        if first_out[nodes.len()] as usize != edges.len() {
            return Err(Error::MalformedGraph(format!(
                "first_out ends at {} but there are {} edges",
                first_out[nodes.len()],
                edges.len()
            )));
        }
        for node in 0..nodes.len() {
            for edge in &edges[first_out[node] as usize..first_out[node + 1] as usize] {
                if edge.head() as usize >= nodes.len() {
                    return Err(Error::InvalidEdge {
                        from: node as NodeId,
                        to: edge.head(),
                        num_nodes: nodes.len(),
                    });
                }
            }
        }

        Ok(FirstOutGraph { nodes, first_out, edges })
    }

    /// Construction for already validated data.
    pub(crate) fn from_parts(nodes: Vec<Node>, first_out: Vec<EdgeId>, edges: Vec<A>) -> Self {
        debug_assert_eq!(first_out.len(), nodes.len() + 1);
        FirstOutGraph { nodes, first_out, edges }
    }

    /// Flatten per node edge lists into the CSR layout in a single pass.
    pub fn from_adjacency_lists(nodes: Vec<Node>, adjacency_lists: Vec<Vec<A>>) -> Result<Self> {
        if adjacency_lists.len() != nodes.len() {
            return Err(Error::MalformedGraph(format!(
                "{} adjacency lists for {} nodes",
                adjacency_lists.len(),
                nodes.len()
            )));
        }
        let first_out = degrees_to_first_out(adjacency_lists.iter().map(|neighbors| neighbors.len() as EdgeId)).collect();
        let edges = adjacency_lists.into_iter().flatten().collect();
        Self::new(nodes, first_out, edges)
    }

    pub fn first_out(&self) -> &[EdgeId] {
        &self.first_out
    }

    pub fn edges(&self) -> &[A] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [A] {
        &mut self.edges
    }

    /// Get the range of edge ids which make up the outgoing edges of `node`
    pub fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        self.first_out[node as usize]..self.first_out[node as usize + 1]
    }

    pub fn edge(&self, edge_id: EdgeId) -> Result<&A> {
        self.edges.get(edge_id as usize).ok_or(Error::EdgeOutOfRange {
            edge: edge_id,
            num_edges: self.edges.len(),
        })
    }

    /// Iterate over all edges as `(tail, edge_id, edge)` triples.
    pub fn all_edges(&self) -> impl Iterator<Item = (NodeId, EdgeId, &A)> + '_ {
        (0..self.num_nodes() as NodeId).flat_map(move |tail| {
            self.neighbor_edge_indices(tail)
                .map(move |edge_id| (tail, edge_id, &self.edges[edge_id as usize]))
        })
    }

    /// Transpose the graph and keep track of which original edge each reversed edge corresponds to.
    pub fn reversed_with_edge_ids(&self) -> ReversedGraphWithEdgeIds<A> {
        let n = self.num_nodes();
        let mut in_degrees = vec![0 as EdgeId; n];
        for edge in &self.edges {
            in_degrees[edge.head() as usize] += 1;
        }
        let first_out: Vec<EdgeId> = degrees_to_first_out(in_degrees.into_iter()).collect();

        let mut insert_positions: Vec<usize> = first_out[..n].iter().map(|&offset| offset as usize).collect();
        let mut edges: Vec<Option<A>> = vec![None; self.edges.len()];
        let mut original_edge_ids = vec![0; self.edges.len()];

        for (tail, edge_id, edge) in self.all_edges() {
            let position = &mut insert_positions[edge.head() as usize];
            edges[*position] = Some(edge.with_head(tail));
            original_edge_ids[*position] = edge_id;
            *position += 1;
        }

        ReversedGraphWithEdgeIds {
            graph: FirstOutGraph::from_parts(self.nodes.clone(), first_out, edges.into_iter().flatten().collect()),
            original_edge_ids,
        }
    }
}

/// Generic Trait for building reversed graphs.
/// Type setup similar to `FromIter` for `std::iter::collect`.
pub trait BuildReversed<G> {
    /// Create a new graph with all edges reversed
    fn reversed(graph: &G) -> Self;
}

impl<A: Arc, G: Adjacency<A>> BuildReversed<G> for FirstOutGraph<A> {
    fn reversed(graph: &G) -> Self {
        let mut reversed: Vec<Vec<A>> = (0..graph.num_nodes()).map(|_| Vec::new()).collect();

        // iterate over all edges and insert them in the reversed structure
        for tail in 0..(graph.num_nodes() as NodeId) {
            for edge in graph.neighbors(tail) {
                reversed[edge.head() as usize].push(edge.with_head(tail));
            }
        }

        let first_out = degrees_to_first_out(reversed.iter().map(|neighbors| neighbors.len() as EdgeId)).collect();
        FirstOutGraph::from_parts(graph.nodes().to_vec(), first_out, reversed.into_iter().flatten().collect())
    }
}

impl<A> Graph for FirstOutGraph<A> {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn num_arcs(&self) -> usize {
        self.edges.len()
    }
}

impl<A: Arc> Adjacency<A> for FirstOutGraph<A> {
    #[inline]
    fn neighbors(&self, node: NodeId) -> &[A] {
        &self.edges[self.first_out[node as usize] as usize..self.first_out[node as usize + 1] as usize]
    }
}

/// Build a first_out array from an iterator of degrees
pub fn degrees_to_first_out<I: Iterator<Item = EdgeId>>(degrees: I) -> impl Iterator<Item = EdgeId> {
    std::iter::once(0).chain(degrees.scan(0, |state, degree| {
        *state += degree as EdgeId;
        Some(*state)
    }))
}
