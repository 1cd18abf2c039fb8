//! Concurrent arc flag computation.
//!
//! For every region and every boundary node of that region a shortest path tree is grown on the transposed graph.
//! All tree edges get the flag of the region. The searches run on a fixed size rayon pool.
//! Flag updates are sent through a channel to a single writer thread, the only one touching the edges.
//! A `WaitGroup` per region blocks until all searches of that region are done.
//! Once all regions are through and the writer has drained the channel, edges within a region are flagged as well.

use super::*;
use crate::algo::shortest_path_tree::ShortestPathTree;
use crossbeam_utils::sync::WaitGroup;
use log::{debug, error, info};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc as Shared,
    },
    thread,
};

/// All edges of one shortest path tree, to be flagged for `region`.
#[derive(Debug)]
pub(crate) struct FlagBatch {
    region: PartitionId,
    edges: Vec<EdgeId>,
}

/// For every region the nodes which are the head of an edge entering it from another region.
/// Sorted and deduplicated, indexed by region.
pub fn boundary_nodes(graph: &FlaggedGraph) -> Vec<Vec<NodeId>> {
    let partitions = graph.partitions();
    let mut boundary = vec![Vec::new(); graph.num_regions()];

    for (tail, _, edge) in graph.graph().all_edges() {
        let head_region = partitions[edge.to as usize];
        if partitions[tail as usize] != head_region {
            boundary[head_region.index()].push(edge.to);
        }
    }

    for nodes in &mut boundary {
        nodes.sort_unstable();
        nodes.dedup();
    }
    boundary
}

pub(crate) fn tree_batch(reversed: &ReversedGraphWithEdgeIds<FlaggedHalfEdge>, root: NodeId, region: PartitionId) -> Result<FlagBatch> {
    let tree = ShortestPathTree::compute(&reversed.graph, root)?;
    let edges = tree
        .tree_edges()
        .into_iter()
        .map(|edge_id| reversed.original_edge_ids[edge_id as usize])
        .collect();
    Ok(FlagBatch { region, edges })
}

/// Compute arc flags for a partitioned graph. Existing flags are discarded.
///
/// Fails if `config` asks for zero workers or any part of the pipeline fails.
/// There is no partial result, a graph is only returned with complete flags.
pub fn compute_arc_flags(graph: FlaggedGraph, config: &ArcFlagConfig) -> Result<FlaggedGraph> {
    run_pipeline(graph, config, tree_batch)
}

/// The preprocessing pipeline with `search` producing the batch of one boundary node.
pub(crate) fn run_pipeline<S>(mut graph: FlaggedGraph, config: &ArcFlagConfig, search: S) -> Result<FlaggedGraph>
where
    S: Fn(&ReversedGraphWithEdgeIds<FlaggedHalfEdge>, NodeId, PartitionId) -> Result<FlagBatch> + Send + Sync + 'static,
{
    if config.num_workers == 0 {
        return Err(Error::Preprocessing("at least one worker is required".to_string()));
    }

    graph.reset_flags();
    let boundary = boundary_nodes(&graph);
    let reversed = Shared::new(graph.reversed_with_edge_ids());
    let search = Shared::new(search);
    info!(
        "computing arc flags for {} nodes, {} edges, {} regions with {} workers",
        graph.num_nodes(),
        graph.num_arcs(),
        boundary.len(),
        config.num_workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .thread_name(|index| format!("arc-flags-{}", index))
        .build()
        .map_err(|e| Error::Preprocessing(format!("could not build worker pool: {}", e)))?;

    let (sender, receiver) = mpsc::channel::<FlagBatch>();
    let writer = thread::Builder::new()
        .name("arc-flag-writer".to_string())
        .spawn(move || -> Result<FlaggedGraph> {
            let mut graph = graph;
            for FlagBatch { region, edges } in receiver {
                for edge_id in edges {
                    graph.flag_edge(edge_id, region)?;
                }
            }
            Ok(graph)
        })
        .map_err(|e| Error::Preprocessing(format!("could not spawn flag writer: {}", e)))?;

    let failed = Shared::new(AtomicBool::new(false));

    for (region, nodes) in boundary.iter().enumerate() {
        if nodes.is_empty() {
            continue;
        }
        let region = PartitionId::new(region as u32)?;
        info!("region {}: {} boundary nodes", region, nodes.len());

        let wait_group = WaitGroup::new();
        for &root in nodes {
            let wait_group = wait_group.clone();
            let sender = sender.clone();
            let reversed = Shared::clone(&reversed);
            let search = Shared::clone(&search);
            let failed = Shared::clone(&failed);

            pool.spawn(move || {
                match panic::catch_unwind(AssertUnwindSafe(|| search(&reversed, root, region))) {
                    Ok(Ok(batch)) => {
                        debug!("region {}: tree of boundary node {} covers {} edges", region, root, batch.edges.len());
                        if sender.send(batch).is_err() {
                            error!("region {}: flag writer hung up", region);
                            failed.store(true, Ordering::SeqCst);
                        }
                    }
                    Ok(Err(e)) => {
                        error!("region {}: search from boundary node {} failed: {}", region, root, e);
                        failed.store(true, Ordering::SeqCst);
                    }
                    Err(_) => {
                        error!("region {}: search from boundary node {} panicked", region, root);
                        failed.store(true, Ordering::SeqCst);
                    }
                }
                drop(wait_group);
            });
        }
        wait_group.wait();
    }

    drop(sender);
    let mut graph = writer
        .join()
        .map_err(|_| Error::Preprocessing("flag writer panicked".to_string()))?
        .map_err(|e| Error::Preprocessing(format!("flag writer failed: {}", e)))?;

    if failed.load(Ordering::SeqCst) {
        return Err(Error::Preprocessing("at least one shortest path tree search failed".to_string()));
    }

    graph.flag_intra_region_edges();
    info!("arc flags done");
    Ok(graph)
}

/// Flags for the graph and for its transpose, the latter for backward searches of bidirectional queries.
pub fn compute_bidirectional_arc_flags(graph: FlaggedGraph, config: &ArcFlagConfig) -> Result<(FlaggedGraph, FlaggedGraph)> {
    let backward = compute_arc_flags(graph.reversed(), config)?;
    let forward = compute_arc_flags(graph, config)?;
    Ok((forward, backward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::dijkstra;

    fn region(id: u32) -> PartitionId {
        PartitionId::new(id).unwrap()
    }

    // 0 - 1 | 2 - 3, all edges in both directions, regions split at the bar
    fn two_regions() -> FlaggedGraph {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 4]);
        builder.add_undirected_edge(0, HalfEdge::new(1, 1)).unwrap();
        builder.add_undirected_edge(1, HalfEdge::new(2, 1)).unwrap();
        builder.add_undirected_edge(2, HalfEdge::new(3, 1)).unwrap();
        builder.add_undirected_edge(0, HalfEdge::new(3, 10)).unwrap();
        FlaggedGraph::from_graph(&builder.into_first_out_graph(), vec![region(0), region(0), region(1), region(1)]).unwrap()
    }

    fn flag_of(graph: &FlaggedGraph, from: NodeId, to: NodeId) -> u64 {
        graph.neighbors(from).iter().find(|edge| edge.to == to).unwrap().flags
    }

    #[test]
    fn boundary_nodes_are_heads_of_crossing_edges() {
        let graph = two_regions();
        assert_eq!(boundary_nodes(&graph), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn flags_on_small_graph() {
        let graph = compute_arc_flags(two_regions(), &ArcFlagConfig::with_workers(2)).unwrap();

        // toward region 1 the long edge 0 -> 3 is never useful
        assert_eq!(flag_of(&graph, 0, 3), 0);
        assert_eq!(flag_of(&graph, 3, 0), 0);
        assert_eq!(flag_of(&graph, 0, 1), 0b11);
        assert_eq!(flag_of(&graph, 1, 2), 0b10);
        assert_eq!(flag_of(&graph, 2, 1), 0b01);
        assert_eq!(flag_of(&graph, 2, 3), 0b10);
        assert_eq!(flag_of(&graph, 1, 0), 0b01);
    }

    #[test]
    fn flagged_subgraph_keeps_distances() {
        let graph = compute_arc_flags(two_regions(), &ArcFlagConfig::with_workers(3)).unwrap();
        let plain = graph.unflagged();

        for from in 0..4 {
            let exact = dijkstra::one_to_all(&plain, from).unwrap();
            for target_region in [region(0), region(1)] {
                let restricted: OwnedGraph = FirstOutGraph::new(
                    plain.nodes().to_vec(),
                    plain.first_out().to_vec(),
                    graph
                        .graph()
                        .edges()
                        .iter()
                        .map(|edge| HalfEdge::new(edge.to, if edge.is_flagged(target_region) { edge.weight } else { INFINITY }))
                        .collect(),
                )
                .unwrap();
                let distances = dijkstra::one_to_all(&restricted, from).unwrap();
                for to in 0..4 {
                    if graph.partition(to).unwrap() == target_region {
                        assert_eq!(distances[to as usize].distance, exact[to as usize].distance);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_workers_are_rejected() {
        assert!(matches!(
            compute_arc_flags(two_regions(), &ArcFlagConfig::with_workers(0)),
            Err(Error::Preprocessing(_))
        ));
    }

    #[test]
    fn recomputation_discards_old_flags() {
        let mut graph = two_regions();
        graph.flag_edge(0, region(5)).unwrap();
        let graph = compute_arc_flags(graph, &ArcFlagConfig::with_workers(1)).unwrap();
        assert!(graph.graph().edges().iter().all(|edge| edge.flags & !0b11 == 0));
    }

    #[test]
    fn bidirectional_flags() {
        let (forward, backward) = compute_bidirectional_arc_flags(two_regions(), &ArcFlagConfig::with_workers(2)).unwrap();
        assert_eq!(backward.partitions(), forward.partitions());
        assert_eq!(backward.num_arcs(), forward.num_arcs());
        // the graph is symmetric, so are the flags
        for from in 0..4 {
            for edge in forward.neighbors(from) {
                assert_eq!(flag_of(&backward, from, edge.to), edge.flags);
            }
        }
    }

    fn failing_run<S>(search: S) -> Result<FlaggedGraph>
    where
        S: Fn(&ReversedGraphWithEdgeIds<FlaggedHalfEdge>, NodeId, PartitionId) -> Result<FlagBatch> + Send + Sync + 'static,
    {
        run_pipeline(two_regions(), &ArcFlagConfig::with_workers(2), search)
    }

    #[test]
    fn panicking_search_aborts_the_run() {
        let result = failing_run(|reversed, root, region| {
            if root == 2 {
                panic!("search from {} blew up", root);
            }
            tree_batch(reversed, root, region)
        });
        assert!(matches!(result, Err(Error::Preprocessing(_))));
    }

    #[test]
    fn failing_search_aborts_the_run() {
        let result = failing_run(|reversed, root, region| {
            if region.index() == 0 {
                return Err(Error::NodeOutOfRange { node: root, num_nodes: 0 });
            }
            tree_batch(reversed, root, region)
        });
        assert!(matches!(result, Err(Error::Preprocessing(_))));
    }

    #[test]
    fn failing_writer_aborts_the_run() {
        // the writer rejects the unknown edge and hangs up, later sends fail
        let result = failing_run(|_, _, region| Ok(FlagBatch { region, edges: vec![EdgeId::MAX] }));
        assert!(matches!(result, Err(Error::Preprocessing(_))));
    }

    #[test]
    fn every_boundary_node_is_searched_once() {
        let searched = Shared::new(std::sync::Mutex::new(Vec::new()));
        let log = Shared::clone(&searched);
        let graph = failing_run(move |reversed, root, region| {
            log.lock().unwrap().push(root);
            tree_batch(reversed, root, region)
        })
        .unwrap();

        let mut searched = searched.lock().unwrap().clone();
        searched.sort_unstable();
        assert_eq!(searched, vec![0, 1, 2, 3]);
        assert_eq!(flag_of(&graph, 1, 2), 0b10);
    }
}
