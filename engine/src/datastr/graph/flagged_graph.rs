//! Partitioned graph with per edge arc flags.
//!
//! Every node belongs to exactly one of at most 64 regions.
//! Every edge carries a 64 bit mask, bit `p` set meaning the edge lies on some shortest path into region `p`.

use super::*;
use serde::{Deserialize, Serialize};

/// Upper bound for the number of regions, flags are packed into a `u64`.
pub const MAX_PARTITIONS: usize = 64;

/// Coordinates are stored with six decimals, so they may be off by half of that after a round trip.
pub const COORDINATE_TOLERANCE: f64 = 1e-6;

/// Id of a region, guaranteed to be in `[0, MAX_PARTITIONS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PartitionId(u8);

impl PartitionId {
    pub fn new(id: u32) -> Result<Self> {
        if (id as usize) < MAX_PARTITIONS {
            Ok(PartitionId(id as u8))
        } else {
            Err(Error::PartitionOutOfRange(id))
        }
    }

    /// For ids computed in a way that keeps them below `MAX_PARTITIONS`.
    pub(crate) fn from_index(id: u8) -> Self {
        debug_assert!((id as usize) < MAX_PARTITIONS);
        PartitionId(id)
    }

    pub fn id(self) -> u32 {
        self.0 as u32
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn mask(self) -> u64 {
        1 << self.0
    }
}

impl TryFrom<u32> for PartitionId {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self> {
        PartitionId::new(id)
    }
}

impl From<PartitionId> for u32 {
    fn from(id: PartitionId) -> u32 {
        id.id()
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half edge with arc flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlaggedHalfEdge {
    pub to: NodeId,
    pub weight: Weight,
    pub flags: u64,
}

impl FlaggedHalfEdge {
    pub fn new(to: NodeId, weight: Weight) -> Self {
        FlaggedHalfEdge { to, weight, flags: 0 }
    }

    #[inline(always)]
    pub fn is_flagged(&self, region: PartitionId) -> bool {
        self.flags & region.mask() != 0
    }

    #[inline(always)]
    pub fn add_flag(&mut self, region: PartitionId) {
        self.flags |= region.mask();
    }

    pub fn reset_flags(&mut self) {
        self.flags = 0;
    }
}

impl Arc for FlaggedHalfEdge {
    #[inline(always)]
    fn head(&self) -> NodeId {
        self.to
    }

    #[inline(always)]
    fn weight(&self) -> Weight {
        self.weight
    }

    #[inline(always)]
    fn with_head(&self, head: NodeId) -> Self {
        FlaggedHalfEdge { to: head, ..*self }
    }
}

impl From<HalfEdge> for FlaggedHalfEdge {
    fn from(edge: HalfEdge) -> Self {
        FlaggedHalfEdge::new(edge.to, edge.weight)
    }
}

/// A `FirstOutGraph` of flagged edges plus one `PartitionId` per node.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedGraph {
    graph: FirstOutGraph<FlaggedHalfEdge>,
    partitions: Vec<PartitionId>,
}

impl FlaggedGraph {
    pub fn new(graph: FirstOutGraph<FlaggedHalfEdge>, partitions: Vec<PartitionId>) -> Result<Self> {
        if partitions.len() != graph.num_nodes() {
            return Err(Error::PartitionCount {
                expected: graph.num_nodes(),
                actual: partitions.len(),
            });
        }
        Ok(FlaggedGraph { graph, partitions })
    }

    /// Attach a partition to a plain graph. All flags start out cleared.
    pub fn from_graph<G: Adjacency<HalfEdge>>(graph: &G, partitions: Vec<PartitionId>) -> Result<Self> {
        let first_out = degrees_to_first_out((0..graph.num_nodes() as NodeId).map(|node| graph.degree(node) as EdgeId)).collect();
        let edges = (0..graph.num_nodes() as NodeId)
            .flat_map(|node| graph.neighbors(node).iter().map(|&edge| FlaggedHalfEdge::from(edge)))
            .collect();
        Self::new(FirstOutGraph::from_parts(graph.nodes().to_vec(), first_out, edges), partitions)
    }

    pub fn graph(&self) -> &FirstOutGraph<FlaggedHalfEdge> {
        &self.graph
    }

    pub fn partitions(&self) -> &[PartitionId] {
        &self.partitions
    }

    pub fn partition(&self, node: NodeId) -> Result<PartitionId> {
        self.check_node(node)?;
        Ok(self.partitions[node as usize])
    }

    /// Number of regions, assuming ids are used densely from zero.
    pub fn num_regions(&self) -> usize {
        self.partitions.iter().map(|p| p.index() + 1).max().unwrap_or(0)
    }

    pub fn reset_flags(&mut self) {
        for edge in self.graph.edges_mut() {
            edge.reset_flags();
        }
    }

    pub fn flag_edge(&mut self, edge_id: EdgeId, region: PartitionId) -> Result<()> {
        let num_edges = self.graph.num_arcs();
        self.graph
            .edges_mut()
            .get_mut(edge_id as usize)
            .ok_or(Error::EdgeOutOfRange { edge: edge_id, num_edges })?
            .add_flag(region);
        Ok(())
    }

    /// Set the flag of the shared region on every edge whose endpoints lie in the same region.
    pub fn flag_intra_region_edges(&mut self) {
        let FlaggedGraph { graph, partitions } = self;
        for tail in 0..partitions.len() {
            let range = graph.neighbor_edge_indices(tail as NodeId);
            let region = partitions[tail];
            for edge in &mut graph.edges_mut()[range.start as usize..range.end as usize] {
                if partitions[edge.to as usize] == region {
                    edge.add_flag(region);
                }
            }
        }
    }

    /// Transpose with partitions and flags carried over.
    pub fn reversed(&self) -> FlaggedGraph {
        FlaggedGraph {
            graph: FirstOutGraph::reversed(&self.graph),
            partitions: self.partitions.clone(),
        }
    }

    pub fn reversed_with_edge_ids(&self) -> ReversedGraphWithEdgeIds<FlaggedHalfEdge> {
        self.graph.reversed_with_edge_ids()
    }

    /// The same graph without partitions and flags.
    pub fn unflagged(&self) -> OwnedGraph {
        let edges = self.graph.edges().iter().map(|edge| HalfEdge::new(edge.to, edge.weight)).collect();
        FirstOutGraph::from_parts(self.graph.nodes().to_vec(), self.graph.first_out().to_vec(), edges)
    }

    /// Whether this is `graph` with partitions and flags attached.
    /// Edges must be identical and in the same order, coordinates equal up to `COORDINATE_TOLERANCE`.
    pub fn is_flagged_version_of<G: Adjacency<HalfEdge>>(&self, graph: &G) -> bool {
        if self.num_nodes() != graph.num_nodes() || self.num_arcs() != graph.num_arcs() {
            return false;
        }
        let same_nodes = self.nodes().iter().zip(graph.nodes()).all(|(ours, theirs)| {
            (ours.lat - theirs.lat).abs() <= COORDINATE_TOLERANCE && (ours.lon - theirs.lon).abs() <= COORDINATE_TOLERANCE
        });
        same_nodes
            && (0..graph.num_nodes() as NodeId).all(|node| {
                let ours = self.neighbors(node);
                let theirs = graph.neighbors(node);
                ours.len() == theirs.len() && ours.iter().zip(theirs).all(|(a, b)| a.to == b.to && a.weight == b.weight)
            })
    }
}

impl Graph for FlaggedGraph {
    fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    fn num_arcs(&self) -> usize {
        self.graph.num_arcs()
    }
}

impl Adjacency<FlaggedHalfEdge> for FlaggedGraph {
    #[inline]
    fn neighbors(&self, node: NodeId) -> &[FlaggedHalfEdge] {
        self.graph.neighbors(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: u32) -> PartitionId {
        PartitionId::new(id).unwrap()
    }

    #[test]
    fn partition_ids_are_capped() {
        assert!(PartitionId::new(63).is_ok());
        assert!(matches!(PartitionId::new(64), Err(Error::PartitionOutOfRange(64))));
        assert!(serde_json::from_str::<PartitionId>("64").is_err());
        assert_eq!(serde_json::from_str::<PartitionId>("7").unwrap(), region(7));
    }

    #[test]
    fn flags_cover_the_full_range() {
        let mut edge = FlaggedHalfEdge::new(1, 10);
        edge.add_flag(region(0));
        edge.add_flag(region(63));
        assert!(edge.is_flagged(region(0)));
        assert!(edge.is_flagged(region(63)));
        assert!(!edge.is_flagged(region(31)));
        assert_eq!(edge.flags, 1 | (1 << 63));
        edge.reset_flags();
        assert!(!edge.is_flagged(region(63)));
    }

    #[test]
    fn intra_region_flagging() {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 3]);
        builder.add_undirected_edge(0, HalfEdge::new(1, 1)).unwrap();
        builder.add_undirected_edge(1, HalfEdge::new(2, 1)).unwrap();
        let graph = builder.into_first_out_graph();

        let mut flagged = FlaggedGraph::from_graph(&graph, vec![region(0), region(0), region(5)]).unwrap();
        flagged.flag_intra_region_edges();

        assert_eq!(flagged.num_regions(), 6);
        assert_eq!(flagged.partition(2).unwrap(), region(5));
        assert!(flagged.partition(3).is_err());
        assert_eq!(flagged.neighbors(0)[0].flags, 1);
        for edge in flagged.neighbors(1) {
            assert_eq!(edge.is_flagged(region(0)), edge.to == 0);
        }
        assert_eq!(flagged.neighbors(2)[0].flags, 0);
        assert_eq!(flagged.unflagged(), graph);
    }

    #[test]
    fn partition_count_must_match() {
        let graph = AdjacencyListGraph::<HalfEdge>::with_nodes(vec![Node::default(); 2]).into_first_out_graph();
        assert!(matches!(
            FlaggedGraph::from_graph(&graph, vec![region(0)]),
            Err(Error::PartitionCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn flagged_version_ignores_rounding() {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::new(53.123456789, -8.987654321), Node::new(0.0, 0.0)]);
        builder.add_edge(0, HalfEdge::new(1, 7)).unwrap();
        let graph = builder.into_first_out_graph();

        let rounded = FirstOutGraph::from_parts(
            vec![Node::new(53.123457, -8.987654), Node::new(0.0, 0.0)],
            graph.first_out().to_vec(),
            vec![FlaggedHalfEdge { to: 1, weight: 7, flags: 0b101 }],
        );
        let flagged = FlaggedGraph::new(rounded, vec![region(0), region(2)]).unwrap();
        assert!(flagged.is_flagged_version_of(&graph));
        assert_ne!(flagged.unflagged(), graph);

        let moved = FirstOutGraph::from_parts(
            vec![Node::new(53.1235, -8.987654), Node::new(0.0, 0.0)],
            graph.first_out().to_vec(),
            vec![FlaggedHalfEdge::new(1, 7)],
        );
        assert!(!FlaggedGraph::new(moved, vec![region(0), region(0)]).unwrap().is_flagged_version_of(&graph));

        let heavier = FirstOutGraph::from_parts(graph.nodes().to_vec(), graph.first_out().to_vec(), vec![FlaggedHalfEdge::new(1, 8)]);
        assert!(!FlaggedGraph::new(heavier, vec![region(0), region(0)]).unwrap().is_flagged_version_of(&graph));
    }
}
