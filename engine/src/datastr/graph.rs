//! Something with graphs 🤷‍♂️
//!
//! Several traits and structs for working with graphs.
//! Graphs come in two flavours: an append-only `AdjacencyListGraph` used while building
//! and the immutable `FirstOutGraph` (CSR layout) which all queries run on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub mod adjacency_list_graph;
pub mod first_out_graph;
pub mod flagged_graph;

pub use self::adjacency_list_graph::AdjacencyListGraph;
pub use self::first_out_graph::{degrees_to_first_out, BuildReversed, FirstOutGraph, OwnedGraph, ReversedGraphWithEdgeIds};
pub use self::flagged_graph::{FlaggedGraph, FlaggedHalfEdge, PartitionId, MAX_PARTITIONS};

/// Node ids are 32bit unsigned ints
pub type NodeId = u32;
/// Edge ids are 32bit unsigned ints
pub type EdgeId = u32;
/// Basic weights are 32bit unsigned ints
pub type Weight = u32;
/// A sufficiently large infinity constant.
/// Set to `u32::MAX / 2` so that `INFINITY + x` for `x <= INFINITY` does not overflow.
pub const INFINITY: Weight = u32::MAX / 2;

/// Geographic position of a node in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(lat: f64, lon: f64) -> Self {
        Node { lat, lon }
    }
}

/// Common behaviour of all edge types stored in adjacency slices.
pub trait Arc: Copy {
    fn head(&self) -> NodeId;
    fn weight(&self) -> Weight;
    /// The same edge with all payload kept but pointing to `head`.
    /// Used for building transposed graphs.
    fn with_head(&self, head: NodeId) -> Self;
}

/// Simple struct for weighted half edges.
/// The tail is implicit through the adjacency slice the edge is stored in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdge {
    pub to: NodeId,
    pub weight: Weight,
}

impl HalfEdge {
    pub fn new(to: NodeId, weight: Weight) -> Self {
        HalfEdge { to, weight }
    }
}

impl Arc for HalfEdge {
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
        HalfEdge { to: head, weight: self.weight }
    }
}

/// Base trait for graphs.
/// Interesting behaviour will be added through subtraits.
pub trait Graph {
    /// All node positions, indexed by `NodeId`.
    fn nodes(&self) -> &[Node];
    fn num_arcs(&self) -> usize;

    fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Fails with `NodeOutOfRange` for ids outside of `[0, num_nodes)`.
    fn check_node(&self, node: NodeId) -> Result<()> {
        if (node as usize) < self.num_nodes() {
            Ok(())
        } else {
            Err(Error::NodeOutOfRange {
                node,
                num_nodes: self.num_nodes(),
            })
        }
    }

    fn node(&self, node: NodeId) -> Result<Node> {
        self.check_node(node)?;
        Ok(self.nodes()[node as usize])
    }
}

/// Graphs which store the outgoing edges of every node as a contiguous slice.
pub trait Adjacency<A: Arc>: Graph {
    /// Outgoing edges of `node`. Panics for invalid ids, use `edges_from` at API boundaries.
    fn neighbors(&self, node: NodeId) -> &[A];

    fn edges_from(&self, node: NodeId) -> Result<&[A]> {
        self.check_node(node)?;
        Ok(self.neighbors(node))
    }

    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }
}

impl<G: Graph> Graph for &G {
    fn nodes(&self) -> &[Node] {
        (**self).nodes()
    }

    fn num_arcs(&self) -> usize {
        (**self).num_arcs()
    }
}

impl<A: Arc, G: Adjacency<A>> Adjacency<A> for &G {
    fn neighbors(&self, node: NodeId) -> &[A] {
        (**self).neighbors(node)
    }
}
