//! Several variants of Dijkstra

use super::*;
use crate::datastr::index_heap::*;

pub mod generic_dijkstra;
pub mod query;

pub use generic_dijkstra::{DijkstraData, DijkstraRun};
pub use query::dijkstra::Server;

/// Priority Queue entries
#[derive(Copy, Clone, Eq, PartialEq, Debug, PartialOrd, Ord)]
pub struct State<W> {
    pub key: W,
    pub node: NodeId,
}

impl<W> Indexing for State<W> {
    #[inline]
    fn as_index(&self) -> usize {
        self.node as usize
    }
}

/// Outcome of a one-to-all search for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DijkstraItem {
    /// `INFINITY` for unreached nodes.
    pub distance: Weight,
    /// `None` for the source and unreached nodes.
    pub predecessor: Option<NodeId>,
}

/// Run Dijkstra from `from` without a target and report distance and predecessor of every node.
pub fn one_to_all<G: Adjacency<A>, A: Arc>(graph: &G, from: NodeId) -> Result<Vec<DijkstraItem>> {
    graph.check_node(from)?;
    let mut run = DijkstraRun::new(graph, from, 0, false);
    while run.settle_next_node(|_: &A| true, |_, _| true, |_| Some(0)).is_some() {}

    let data = run.into_data();
    Ok(data
        .distances
        .into_iter()
        .zip(data.predecessors)
        .map(|(distance, predecessor)| DijkstraItem { distance, predecessor })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_to_all_reports_distances_and_predecessors() {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 5]);
        builder.add_edge(0, HalfEdge::new(1, 4)).unwrap();
        builder.add_edge(0, HalfEdge::new(2, 1)).unwrap();
        builder.add_edge(2, HalfEdge::new(1, 2)).unwrap();
        builder.add_edge(1, HalfEdge::new(3, 5)).unwrap();
        builder.add_edge(4, HalfEdge::new(0, 1)).unwrap();
        let graph = builder.into_first_out_graph();

        let items = one_to_all(&graph, 0).unwrap();
        let distances: Vec<Weight> = items.iter().map(|item| item.distance).collect();
        assert_eq!(distances, vec![0, 3, 1, 8, INFINITY]);
        assert_eq!(items[0].predecessor, None);
        assert_eq!(items[1].predecessor, Some(2));
        assert_eq!(items[3].predecessor, Some(1));
        assert_eq!(items[4].predecessor, None);

        assert!(one_to_all(&graph, 5).is_err());
    }
}
