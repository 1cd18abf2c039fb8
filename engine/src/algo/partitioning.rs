//! Assign every node to one of at most 64 regions.
//!
//! Both strategies are deterministic and only depend on node positions and ids.

use super::*;
use std::cmp::Ordering;

/// Number of grid cells per axis.
pub const GRID_CELLS_PER_AXIS: u32 = 8;
/// Deepest KD split which still fits into 64 regions.
pub const MAX_KD_DEPTH: u8 = 6;

fn grid_bin(value: f64, offset: f64, extent: f64) -> u32 {
    let bin = ((value + offset) / extent * GRID_CELLS_PER_AXIS as f64).floor();
    bin.max(0.0).min((GRID_CELLS_PER_AXIS - 1) as f64) as u32
}

/// Grid cell of a position, `row * 8 + col` with rows from latitude and columns from longitude.
pub fn grid_cell(node: &Node) -> PartitionId {
    let row = grid_bin(node.lat, 90.0, 180.0);
    let col = grid_bin(node.lon, 180.0, 360.0);
    PartitionId::from_index((row * GRID_CELLS_PER_AXIS + col) as u8)
}

/// 8x8 grid over latitude and longitude. Always 64 regions, some of them possibly empty.
pub fn grid_partitions<G: Graph>(graph: &G) -> Vec<PartitionId> {
    graph.nodes().iter().map(grid_cell).collect()
}

/// Recursive median bisection, alternating between latitude and longitude, `2^depth` regions.
/// Nodes with equal coordinates are ordered by id.
pub fn kd_partitions<G: Graph>(graph: &G, depth: u8) -> Result<Vec<PartitionId>> {
    if depth > MAX_KD_DEPTH {
        return Err(Error::PartitionDepth(depth));
    }
    let nodes = graph.nodes();
    let mut cells: Vec<Vec<NodeId>> = vec![(0..nodes.len() as NodeId).collect()];

    for level in 0..depth {
        let by_latitude = level % 2 == 0;
        let mut next_cells = Vec::with_capacity(cells.len() * 2);
        for mut cell in cells {
            cell.sort_unstable_by(|&a, &b| {
                let (a_pos, b_pos) = (&nodes[a as usize], &nodes[b as usize]);
                let ordering = if by_latitude {
                    a_pos.lat.total_cmp(&b_pos.lat)
                } else {
                    a_pos.lon.total_cmp(&b_pos.lon)
                };
                match ordering {
                    Ordering::Equal => a.cmp(&b),
                    ordering => ordering,
                }
            });
            let upper = cell.split_off(cell.len() / 2);
            next_cells.push(cell);
            next_cells.push(upper);
        }
        cells = next_cells;
    }

    let mut partitions = vec![PartitionId::new(0)?; nodes.len()];
    for (id, cell) in cells.iter().enumerate() {
        let region = PartitionId::new(id as u32)?;
        for &node in cell {
            partitions[node as usize] = region;
        }
    }
    Ok(partitions)
}

/// Grid partition a graph into a `FlaggedGraph` with all flags cleared.
pub fn grid_partitioning<G: Adjacency<HalfEdge>>(graph: &G) -> Result<FlaggedGraph> {
    FlaggedGraph::from_graph(graph, grid_partitions(graph))
}

/// KD partition a graph into a `FlaggedGraph` with all flags cleared.
pub fn kd_partitioning<G: Adjacency<HalfEdge>>(graph: &G, depth: u8) -> Result<FlaggedGraph> {
    FlaggedGraph::from_graph(graph, kd_partitions(graph, depth)?)
}

/// Available partitioning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
    Grid,
    Kd { depth: u8 },
}

impl Partitioning {
    pub fn partition<G: Adjacency<HalfEdge>>(self, graph: &G) -> Result<FlaggedGraph> {
        match self {
            Partitioning::Grid => grid_partitioning(graph),
            Partitioning::Kd { depth } => kd_partitioning(graph, depth),
        }
    }

    pub fn num_regions(self) -> usize {
        match self {
            Partitioning::Grid => (GRID_CELLS_PER_AXIS * GRID_CELLS_PER_AXIS) as usize,
            Partitioning::Kd { depth } => 1 << depth,
        }
    }
}
