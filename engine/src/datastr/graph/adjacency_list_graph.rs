//! Build-time graph with one growable edge list per node.

use super::*;

/// Append-only graph used while assembling a network.
/// Convert into a `FirstOutGraph` once all nodes and edges are known.
#[derive(Debug, Clone)]
pub struct AdjacencyListGraph<A = HalfEdge> {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<A>>,
    num_arcs: usize,
}

impl<A: Arc> AdjacencyListGraph<A> {
    pub fn new() -> Self {
        AdjacencyListGraph {
            nodes: Vec::new(),
            adjacency: Vec::new(),
            num_arcs: 0,
        }
    }

    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        let adjacency = (0..nodes.len()).map(|_| Vec::new()).collect();
        AdjacencyListGraph { nodes, adjacency, num_arcs: 0 }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        (self.nodes.len() - 1) as NodeId
    }

    /// Append an edge to the adjacency list of `from`.
    /// Returns `Ok(false)` without modifying the graph if `from` already has an edge to the same head.
    pub fn add_edge(&mut self, from: NodeId, edge: A) -> Result<bool> {
        let num_nodes = self.num_nodes();
        if from as usize >= num_nodes || edge.head() as usize >= num_nodes {
            return Err(Error::InvalidEdge {
                from,
                to: edge.head(),
                num_nodes,
            });
        }

        let neighbors = &mut self.adjacency[from as usize];
        if neighbors.iter().any(|existing| existing.head() == edge.head()) {
            return Ok(false);
        }
        neighbors.push(edge);
        self.num_arcs += 1;
        Ok(true)
    }

    /// Add `edge` from `from` and its reverse counterpart.
    pub fn add_undirected_edge(&mut self, from: NodeId, edge: A) -> Result<()> {
        self.add_edge(from, edge)?;
        self.add_edge(edge.head(), edge.with_head(from))?;
        Ok(())
    }

    pub fn into_first_out_graph(self) -> FirstOutGraph<A> {
        let first_out = degrees_to_first_out(self.adjacency.iter().map(|neighbors| neighbors.len() as EdgeId)).collect();
        let edges = self.adjacency.into_iter().flatten().collect();
        FirstOutGraph::from_parts(self.nodes, first_out, edges)
    }
}

impl<A: Arc> From<AdjacencyListGraph<A>> for FirstOutGraph<A> {
    fn from(graph: AdjacencyListGraph<A>) -> Self {
        graph.into_first_out_graph()
    }
}

impl<A> Graph for AdjacencyListGraph<A> {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn num_arcs(&self) -> usize {
        self.num_arcs
    }
}

impl<A: Arc> Adjacency<A> for AdjacencyListGraph<A> {
    fn neighbors(&self, node: NodeId) -> &[A] {
        &self.adjacency[node as usize]
    }
}
