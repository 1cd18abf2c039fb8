//! Basic variant of dijkstras algorithm
//!
//! `DijkstraRun` is the single search kernel behind all query variants.
//! Variants customize it through three callbacks passed to `settle_next_node`:
//! an edge predicate to skip edges, an improve callback which observes every distance improvement
//! and may veto pushing the node, and a potential which turns Dijkstra into A*.

use super::*;

/// Per query search state, sized for the whole graph.
#[derive(Debug, Clone)]
pub struct DijkstraData {
    pub distances: Vec<Weight>,
    pub predecessors: Vec<Option<NodeId>>,
    pub settled: Vec<bool>,
    pub queue: IndexdMinHeap<State<Weight>>,
}

impl DijkstraData {
    pub fn new(n: usize) -> Self {
        Self {
            distances: vec![INFINITY; n],
            predecessors: vec![None; n],
            settled: vec![false; n],
            queue: IndexdMinHeap::new(n),
        }
    }

    /// Follow the predecessors from `to` back to `from`.
    pub fn node_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        let mut path = vec![to];
        let mut current = to;

        while current != from {
            match self.predecessors[current as usize] {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}

pub struct DijkstraRun<'a, G> {
    graph: &'a G,
    data: DijkstraData,
    num_queue_pops: usize,
    search_space: Option<Vec<NodeId>>,
}

impl<'a, G: Graph> DijkstraRun<'a, G> {
    /// Start a new search from `from`. `initial_key` is the queue key of the source,
    /// usually zero or the potential of the source.
    pub fn new(graph: &'a G, from: NodeId, initial_key: Weight, collect_search_space: bool) -> Self {
        let mut data = DijkstraData::new(graph.num_nodes());
        data.distances[from as usize] = 0;
        data.queue.push(State { key: initial_key, node: from });

        Self {
            graph,
            data,
            num_queue_pops: 0,
            search_space: if collect_search_space { Some(Vec::new()) } else { None },
        }
    }

    /// Add another source with distance zero, turning this into a multi source search.
    pub fn add_source(&mut self, node: NodeId, key: Weight) {
        self.data.distances[node as usize] = 0;
        self.data.predecessors[node as usize] = None;
        self.data.settled[node as usize] = false;
        if self.data.queue.contains_index(node as usize) {
            self.data.queue.decrease_key(State { key, node });
        } else {
            self.data.queue.push(State { key, node });
        }
    }

    /// Pop the node with the smallest key, mark it settled and relax its outgoing edges.
    ///
    /// For every edge accepted by `edge_predicate` which improves the tentative distance of its head,
    /// distance and predecessor are updated and `improve_callback(head, distance)` is called.
    /// Only if it returns true and `potential(head)` is not `None` the head is pushed or its key decreased.
    /// A node whose distance improves after it was settled is reopened.
    #[inline]
    pub fn settle_next_node<A, P, I, Pot>(&mut self, mut edge_predicate: P, mut improve_callback: I, mut potential: Pot) -> Option<NodeId>
    where
        G: Adjacency<A>,
        A: Arc,
        P: FnMut(&A) -> bool,
        I: FnMut(NodeId, Weight) -> bool,
        Pot: FnMut(NodeId) -> Option<Weight>,
    {
        let State { node, .. } = self.data.queue.pop()?;
        self.num_queue_pops += 1;
        self.data.settled[node as usize] = true;
        if let Some(search_space) = &mut self.search_space {
            search_space.push(node);
        }

        let distance = self.data.distances[node as usize];
        for edge in self.graph.neighbors(node) {
            if !edge_predicate(edge) {
                continue;
            }
            let head = edge.head();
            let next_distance = distance.saturating_add(edge.weight());

            if next_distance < self.data.distances[head as usize] {
                self.data.distances[head as usize] = next_distance;
                self.data.predecessors[head as usize] = Some(node);

                if improve_callback(head, next_distance) {
                    if let Some(pot) = potential(head) {
                        let next = State {
                            key: next_distance.saturating_add(pot),
                            node: head,
                        };
                        if self.data.queue.contains_index(head as usize) {
                            self.data.queue.decrease_key(next);
                        } else {
                            self.data.settled[head as usize] = false;
                            self.data.queue.push(next);
                        }
                    }
                }
            }
        }

        Some(node)
    }

    /// Key of the next node to be settled.
    pub fn min_key(&self) -> Option<Weight> {
        self.data.queue.peek().map(|state| state.key)
    }

    pub fn tentative_distance(&self, node: NodeId) -> Weight {
        self.data.distances[node as usize]
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.data.settled[node as usize]
    }

    pub fn node_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        self.data.node_path(from, to)
    }

    pub fn num_queue_pops(&self) -> usize {
        self.num_queue_pops
    }

    pub fn take_search_space(&mut self) -> Option<Vec<NodeId>> {
        self.search_space.take()
    }

    pub fn into_data(self) -> DijkstraData {
        self.data
    }
}
