//! Shortest path trees which keep every tied predecessor.
//!
//! With ties the union of all shortest paths from the root forms a DAG rather than a tree.
//! Arc flag preprocessing needs every edge of that DAG, otherwise one of several equally short
//! paths may end up unflagged. The tree is stored as an arena indexed by node id.

use super::*;
use crate::algo::dijkstra::State;
use crate::datastr::index_heap::IndexdMinHeap;

/// All shortest paths from a single root.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    root: NodeId,
    distances: Vec<Weight>,
    // (child, edge id of parent -> child) per parent
    children: Vec<Vec<(NodeId, EdgeId)>>,
}

impl ShortestPathTree {
    /// Run Dijkstra from `root`, recording every edge `(u, v)` with `d(u) + w(u, v) == d(v)`.
    pub fn compute<A: Arc>(graph: &FirstOutGraph<A>, root: NodeId) -> Result<Self> {
        graph.check_node(root)?;
        let n = graph.num_nodes();
        let mut distances = vec![INFINITY; n];
        let mut parents: Vec<Vec<(NodeId, EdgeId)>> = vec![Vec::new(); n];
        let mut queue: IndexdMinHeap<State<Weight>> = IndexdMinHeap::new(n);

        distances[root as usize] = 0;
        queue.push(State { key: 0, node: root });

        while let Some(State { key: distance, node }) = queue.pop() {
            for (edge_id, edge) in graph.neighbor_edge_indices(node).zip(graph.neighbors(node)) {
                let head = edge.head();
                let next_distance = distance.saturating_add(edge.weight());
                if next_distance >= INFINITY {
                    continue;
                }
                let head_distance = &mut distances[head as usize];

                if next_distance < *head_distance {
                    *head_distance = next_distance;
                    parents[head as usize].clear();
                    parents[head as usize].push((node, edge_id));
                    let next = State { key: next_distance, node: head };
                    if queue.contains_index(head as usize) {
                        queue.decrease_key(next);
                    } else {
                        queue.push(next);
                    }
                } else if next_distance == *head_distance && head != root {
                    parents[head as usize].push((node, edge_id));
                }
            }
        }

        let mut children = vec![Vec::new(); n];
        for (child, node_parents) in parents.into_iter().enumerate() {
            for (parent, edge_id) in node_parents {
                children[parent as usize].push((child as NodeId, edge_id));
            }
        }

        Ok(ShortestPathTree { root, distances, children })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// `INFINITY` for nodes not reachable from the root.
    pub fn distance(&self, node: NodeId) -> Weight {
        self.distances[node as usize]
    }

    /// Nodes with a shortest path through `node` as their last hop, with the edge used.
    pub fn children(&self, node: NodeId) -> &[(NodeId, EdgeId)] {
        &self.children[node as usize]
    }

    /// Ids of all edges on some shortest path from the root, in depth first order.
    pub fn tree_edges(&self) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut visited = vec![false; self.children.len()];
        let mut stack = vec![self.root];
        visited[self.root as usize] = true;

        while let Some(node) = stack.pop() {
            for &(child, edge_id) in &self.children[node as usize] {
                edges.push(edge_id);
                if !visited[child as usize] {
                    visited[child as usize] = true;
                    stack.push(child);
                }
            }
        }

        edges
    }
}
