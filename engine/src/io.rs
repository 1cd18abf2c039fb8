//! Utilities for reading and writing graphs from and to disk.
//!
//! Graphs are stored in the plain text fmi format:
//!
//! ```text
//! # comments and blank lines are ignored
//! <number of nodes>
//! <number of edges>
//! <id> <lat> <lon>              one line per node, ids in increasing order
//! <from> <to> <weight>          one line per edge
//! ```
//!
//! The partitioned variant appends the partition id to every node line and the arc flags to every edge line.
//! Landmark ids are stored as a JSON array.
//!
//! # Example
//!
//! ```no_run
//! # use ocean_router::io::*;
//!
//! let graph = read_fmi_file("ocean.fmi")?;
//! write_fmi_file(&graph, "copy.fmi")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::datastr::graph::*;
use crate::error::{Error, Result};
use std::{
    fs::File,
    io::{prelude::*, BufReader, BufWriter, Lines},
    path::Path,
    str::FromStr,
};

// Header counts are untrusted, vectors grow past this on their own.
const MAX_PREALLOCATED: usize = 1 << 20;

/// Iterates over the meaningful lines of an fmi file, keeping track of line numbers.
struct FmiLines<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> FmiLines<R> {
    fn new(reader: R) -> Self {
        FmiLines { lines: reader.lines(), line: 0 }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        for line in &mut self.lines {
            self.line += 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
        Ok(None)
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        self.next_line()?.ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))
    }

    fn error(&self, message: String) -> Error {
        Error::Parse { line: self.line, message }
    }

    /// Split the next line into exactly `N` whitespace separated fields.
    fn fields<const N: usize>(&mut self, what: &str) -> Result<[String; N]> {
        let line = self.expect_line(what)?;
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        fields
            .try_into()
            .map_err(|fields: Vec<String>| self.error(format!("expected {} fields for {}, got {}", N, what, fields.len())))
    }

    fn parse<T: FromStr>(&self, field: &str, what: &str) -> Result<T> {
        field.parse().map_err(|_| self.error(format!("invalid {}: {:?}", what, field)))
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let line = self.expect_line(what)?;
        self.parse(&line, what)
    }

    fn node<const N: usize>(&mut self, expected_id: usize) -> Result<([String; N], Node)> {
        let fields = self.fields::<N>("node")?;
        let id: usize = self.parse(&fields[0], "node id")?;
        if id != expected_id {
            return Err(self.error(format!("expected node {}, got node {}", expected_id, id)));
        }
        let node = Node::new(self.parse(&fields[1], "latitude")?, self.parse(&fields[2], "longitude")?);
        Ok((fields, node))
    }

    fn edge<const N: usize>(&mut self, num_nodes: usize) -> Result<([String; N], NodeId, NodeId, Weight)> {
        let fields = self.fields::<N>("edge")?;
        let from: NodeId = self.parse(&fields[0], "tail")?;
        let to: NodeId = self.parse(&fields[1], "head")?;
        if from as usize >= num_nodes || to as usize >= num_nodes {
            return Err(self.error(format!("edge {} -> {} references a node outside of [0, {})", from, to, num_nodes)));
        }
        let weight = self.parse(&fields[2], "weight")?;
        Ok((fields, from, to, weight))
    }

    fn finish(&mut self) -> Result<()> {
        if self.next_line()?.is_some() {
            return Err(self.error("more edges than announced in the header".to_string()));
        }
        Ok(())
    }
}

/// Read a graph in fmi format.
pub fn read_fmi<R: BufRead>(reader: R) -> Result<OwnedGraph> {
    let mut lines = FmiLines::new(reader);
    let num_nodes = lines.count("number of nodes")?;
    let num_edges = lines.count("number of edges")?;

    let mut nodes = Vec::with_capacity(num_nodes.min(MAX_PREALLOCATED));
    for id in 0..num_nodes {
        let (_, node) = lines.node::<3>(id)?;
        nodes.push(node);
    }

    let mut adjacency_lists = vec![Vec::new(); nodes.len()];
    for _ in 0..num_edges {
        let (_, from, to, weight) = lines.edge::<3>(num_nodes)?;
        adjacency_lists[from as usize].push(HalfEdge::new(to, weight));
    }
    lines.finish()?;

    FirstOutGraph::from_adjacency_lists(nodes, adjacency_lists)
}

/// Read a graph with partitions and arc flags.
pub fn read_partitioned_fmi<R: BufRead>(reader: R) -> Result<FlaggedGraph> {
    let mut lines = FmiLines::new(reader);
    let num_nodes = lines.count("number of nodes")?;
    let num_edges = lines.count("number of edges")?;

    let mut nodes = Vec::with_capacity(num_nodes.min(MAX_PREALLOCATED));
    let mut partitions = Vec::with_capacity(num_nodes.min(MAX_PREALLOCATED));
    for id in 0..num_nodes {
        let (fields, node) = lines.node::<4>(id)?;
        let partition: u32 = lines.parse(&fields[3], "partition")?;
        partitions.push(PartitionId::new(partition).map_err(|e| lines.error(e.to_string()))?);
        nodes.push(node);
    }

    let mut adjacency_lists = vec![Vec::new(); nodes.len()];
    for _ in 0..num_edges {
        let (fields, from, to, weight) = lines.edge::<4>(num_nodes)?;
        let flags = lines.parse(&fields[3], "arc flags")?;
        adjacency_lists[from as usize].push(FlaggedHalfEdge { to, weight, flags });
    }
    lines.finish()?;

    FlaggedGraph::new(FirstOutGraph::from_adjacency_lists(nodes, adjacency_lists)?, partitions)
}

/// Write a graph in fmi format, coordinates with six decimals.
pub fn write_fmi<G: Adjacency<HalfEdge>, W: Write>(graph: &G, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "{}", graph.num_nodes())?;
    writeln!(writer, "{}", graph.num_arcs())?;
    for (id, node) in graph.nodes().iter().enumerate() {
        writeln!(writer, "{} {:.6} {:.6}", id, node.lat, node.lon)?;
    }
    for tail in 0..graph.num_nodes() as NodeId {
        for edge in graph.neighbors(tail) {
            writeln!(writer, "{} {} {}", tail, edge.to, edge.weight)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a graph together with its partitions and arc flags.
pub fn write_partitioned_fmi<W: Write>(graph: &FlaggedGraph, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "{}", graph.num_nodes())?;
    writeln!(writer, "{}", graph.num_arcs())?;
    for (id, (node, partition)) in graph.nodes().iter().zip(graph.partitions()).enumerate() {
        writeln!(writer, "{} {:.6} {:.6} {}", id, node.lat, node.lon, partition)?;
    }
    for (tail, _, edge) in graph.graph().all_edges() {
        writeln!(writer, "{} {} {} {}", tail, edge.to, edge.weight, edge.flags)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_fmi_file<P: AsRef<Path>>(path: P) -> Result<OwnedGraph> {
    read_fmi(BufReader::new(File::open(path)?))
}

pub fn write_fmi_file<G: Adjacency<HalfEdge>, P: AsRef<Path>>(graph: &G, path: P) -> Result<()> {
    write_fmi(graph, File::create(path)?)
}

pub fn read_partitioned_fmi_file<P: AsRef<Path>>(path: P) -> Result<FlaggedGraph> {
    read_partitioned_fmi(BufReader::new(File::open(path)?))
}

pub fn write_partitioned_fmi_file<P: AsRef<Path>>(graph: &FlaggedGraph, path: P) -> Result<()> {
    write_partitioned_fmi(graph, File::create(path)?)
}

/// Load landmark ids from a JSON array.
pub fn read_landmarks<P: AsRef<Path>>(path: P) -> Result<Vec<NodeId>> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

pub fn write_landmarks<P: AsRef<Path>>(landmarks: &[NodeId], path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, landmarks)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "# a small square
4
8

0 53.5 9.9
1 53.5 10.1
2 53.6 10.1
# the last node
3 53.6 9.9
0 1 1
0 3 5
1 0 1
1 2 1
2 1 1
2 3 1
3 0 5
3 2 1
";

    #[test]
    fn parse_plain_fmi() {
        let graph = read_fmi(SQUARE.as_bytes()).unwrap();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_arcs(), 8);
        assert_eq!(graph.node(2).unwrap(), Node::new(53.6, 10.1));
        assert_eq!(graph.neighbors(0), &[HalfEdge::new(1, 1), HalfEdge::new(3, 5)]);
        assert_eq!(graph.neighbors(3), &[HalfEdge::new(0, 5), HalfEdge::new(2, 1)]);
    }

    #[test]
    fn write_then_read_plain_fmi() {
        let graph = read_fmi(SQUARE.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_fmi(&graph, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("4\n8\n0 53.500000 9.900000\n"));
        assert_eq!(read_fmi(text.as_bytes()).unwrap(), graph);
    }

    #[test]
    fn partitioned_fmi_keeps_partitions_and_flags() {
        let graph = read_fmi(SQUARE.as_bytes()).unwrap();
        let regions = [0, 0, 1, 63].iter().map(|&p| PartitionId::new(p).unwrap()).collect();
        let mut flagged = FlaggedGraph::from_graph(&graph, regions).unwrap();
        flagged.flag_intra_region_edges();
        flagged.flag_edge(3, PartitionId::new(63).unwrap()).unwrap();

        let mut buffer = Vec::new();
        write_partitioned_fmi(&flagged, &mut buffer).unwrap();
        let read = read_partitioned_fmi(&buffer[..]).unwrap();
        assert_eq!(read, flagged);
        assert_eq!(read.partition(3).unwrap().id(), 63);
    }

    #[test]
    fn malformed_input() {
        let parse_line = |input: &str| match read_fmi(input.as_bytes()) {
            Err(Error::Parse { line, .. }) => line,
            other => panic!("expected parse error, got {:?}", other),
        };

        assert_eq!(parse_line("2\n1\n0 0 0\n"), 3);
        assert_eq!(parse_line("2\n1\n1 0 0\n0 0 0\n0 1 1\n"), 3);
        assert_eq!(parse_line("2\n1\n0 0 0\n1 0 0\n0 2 1\n"), 5);
        assert_eq!(parse_line("2\n1\n0 0 0\n1 0 0\n0 1 x\n"), 5);
        assert_eq!(parse_line("2\n1\n0 0 0\n1 0 0\n0 1 1\n1 0 1\n"), 6);
        assert_eq!(parse_line("2\n1\n0 0\n"), 3);
        assert_eq!(parse_line("two\n"), 1);
        assert_eq!(parse_line("18446744073709551615\n0\n"), 2);
        assert_eq!(parse_line("3\n18446744073709551615\n0 0 0\n1 0 0\n2 0 0\n"), 5);
        assert!(matches!(
            read_partitioned_fmi("1\n0\n0 0 0 64\n".as_bytes()),
            Err(Error::Parse { line: 3, .. })
        ));
        assert!(matches!(
            read_partitioned_fmi("18446744073709551615\n0\n".as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn rounded_coordinates_still_match_the_plain_graph() {
        let graph = read_fmi("2\n1\n0 53.123456789 -8.987654321\n1 1.5 2.5\n0 1 4\n".as_bytes()).unwrap();
        let partitions = vec![PartitionId::new(0).unwrap(), PartitionId::new(1).unwrap()];
        let flagged = FlaggedGraph::from_graph(&graph, partitions).unwrap();

        let mut buffer = Vec::new();
        write_partitioned_fmi(&flagged, &mut buffer).unwrap();
        let read_back = read_partitioned_fmi(buffer.as_slice()).unwrap();

        assert_ne!(read_back.nodes(), graph.nodes());
        assert!(read_back.is_flagged_version_of(&graph));
    }
}
