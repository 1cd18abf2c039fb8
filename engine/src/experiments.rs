//! Random query experiments for comparing routers.

use crate::{
    algo::{Query, Route, Router},
    datastr::graph::*,
    error::Result,
    report::*,
};
use rand::prelude::*;
use std::time::Duration;

/// Number of queries performed for experiments.
/// Can be overriden through the NUM_QUERIES env var.
pub fn num_queries() -> usize {
    std::env::var("NUM_QUERIES").ok().and_then(|num| num.parse().ok()).unwrap_or(1000)
}

/// Number of landmarks for ALT experiments.
/// Can be overriden through the NUM_LANDMARKS env var.
pub fn num_landmarks() -> usize {
    std::env::var("NUM_LANDMARKS").ok().and_then(|num| num.parse().ok()).unwrap_or(16)
}

/// Aggregated outcome of a batch of queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    pub num_queries: usize,
    pub num_reachable: usize,
    pub total_time: Duration,
    pub total_queue_pops: usize,
}

impl QueryStats {
    pub fn avg_time_ms(&self) -> f64 {
        if self.num_queries == 0 {
            return 0.0;
        }
        self.total_time.as_secs_f64() * 1000.0 / self.num_queries as f64
    }

    pub fn avg_queue_pops(&self) -> f64 {
        if self.num_queries == 0 {
            return 0.0;
        }
        self.total_queue_pops as f64 / self.num_queries as f64
    }

    fn add(&mut self, route: &Route, time: Duration) {
        self.num_queries += 1;
        if route.is_reachable() {
            self.num_reachable += 1;
        }
        self.total_time += time;
        self.total_queue_pops += route.num_queue_pops;
    }
}

/// Uniformly random source-target pairs.
pub fn random_queries(num_nodes: usize, rng: &mut StdRng, num_queries: usize) -> Vec<Query> {
    (0..num_queries)
        .map(|_| Query {
            from: rng.gen_range(0..num_nodes as NodeId),
            to: rng.gen_range(0..num_nodes as NodeId),
        })
        .collect()
}

/// Run the given queries and report every one of them as an item of `reporting_context`.
pub fn run_queries(queries: &[Query], router: &dyn Router, reporting_context: &mut CollectionContextGuard) -> Result<QueryStats> {
    let mut stats = QueryStats::default();

    for &query in queries {
        let _query_ctxt = reporting_context.push_collection_item();
        let (route, time) = measure(|| router.query(query));
        let route = route?;

        report!("from", query.from);
        report!("to", query.to);
        report!("running_time_ms", time.as_secs_f64() * 1000.0);
        report!("result", route.length);
        report!("num_queue_pops", route.num_queue_pops);

        stats.add(&route, time);
    }

    Ok(stats)
}

/// `num_queries` uniformly random queries, see `run_queries`.
pub fn run_random_queries(
    num_nodes: usize,
    router: &dyn Router,
    rng: &mut StdRng,
    reporting_context: &mut CollectionContextGuard,
    num_queries: usize,
) -> Result<QueryStats> {
    run_queries(&random_queries(num_nodes, rng, num_queries), router, reporting_context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::dijkstra;

    #[test]
    fn stats_count_reachable_queries() {
        let mut builder = AdjacencyListGraph::with_nodes(vec![Node::default(); 3]);
        builder.add_edge(0, HalfEdge::new(1, 2)).unwrap();
        let graph = builder.into_first_out_graph();
        let server = dijkstra::Server::new(&graph);

        let mut ctxt = push_collection_context("queries".to_string());
        let queries = [Query { from: 0, to: 1 }, Query { from: 1, to: 0 }, Query { from: 2, to: 2 }];
        let stats = run_queries(&queries, &server, &mut ctxt).unwrap();
        assert_eq!(stats.num_queries, 3);
        assert_eq!(stats.num_reachable, 2);
        assert!(stats.avg_queue_pops() > 0.0);
    }

    #[test]
    fn random_queries_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let queries = random_queries(10, &mut rng, 50);
        assert_eq!(queries.len(), 50);
        assert!(queries.iter().all(|query| query.from < 10 && query.to < 10));
    }
}
