// Random query benchmark over all routers.
//
// Usage: benchmark <graph.fmi> [flagged.fmi] [landmarks.json]
// NUM_QUERIES and NUM_LANDMARKS control the number of queries and of landmarks selected when no file is given.

#[macro_use]
extern crate ocean_router;
use ocean_router::{
    algo::{
        a_star, alt,
        arc_flags::{self, compute_arc_flags, ArcFlagConfig},
        dijkstra::{self, query::{bidirectional_dijkstra, sym_bidir_astar}},
        partitioning::Partitioning,
        Router,
    },
    cli::*,
    datastr::graph::*,
    experiments::{self, QueryStats},
    io::*,
    report::*,
};
use rand::prelude::*;
use std::{env, error::Error};

fn benchmark(name: &str, num_nodes: usize, router: &dyn Router, num_queries: usize) -> Result<QueryStats, Box<dyn Error>> {
    let _ctxt = push_context(name.to_string());
    let mut rng = StdRng::seed_from_u64(42);
    let mut queries_ctxt = push_collection_context("queries".to_string());
    let stats = report_time(name, || experiments::run_random_queries(num_nodes, router, &mut rng, &mut queries_ctxt, num_queries))?;
    drop(queries_ctxt);

    report!("avg_running_time_ms", stats.avg_time_ms());
    report!("avg_queue_pops", stats.avg_queue_pops());
    report!("num_reachable", stats.num_reachable);
    log::info!(
        "{}: {:.3}ms, {:.1} pops on average, {} of {} reachable",
        name,
        stats.avg_time_ms(),
        stats.avg_queue_pops(),
        stats.num_reachable,
        stats.num_queries
    );
    Ok(stats)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let _reporter = enable_reporting("benchmark");

    let mut args = env::args().skip(1);
    let graph = read_fmi_file(next_arg(&mut args, "No graph given")?)?;
    let flagged = match args.next() {
        Some(path) => read_partitioned_fmi_file(path)?,
        None => report_time_with_key("arc flag computation", "arc_flags_ms", || {
            compute_arc_flags(Partitioning::Grid.partition(&graph)?, &ArcFlagConfig::default())
        })?,
    };
    if !flagged.is_flagged_version_of(&graph) {
        return Err(Box::new(CliErr("Flagged graph does not match the plain graph")));
    }
    let landmark_ids = match args.next() {
        Some(path) => read_landmarks(path)?,
        None => alt::farthest_landmarks(&graph, experiments::num_landmarks(), 0)?,
    };
    report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs() });
    report!("landmarks", landmark_ids);

    let landmarks = report_time_with_key("landmark preprocessing", "landmarks_ms", || alt::precompute_landmarks(&graph, &landmark_ids))?;
    let backward_flagged = report_time_with_key("backward arc flag computation", "backward_arc_flags_ms", || {
        compute_arc_flags(flagged.reversed(), &ArcFlagConfig::default())
    })?;

    let num_nodes = graph.num_nodes();
    let num_queries = experiments::num_queries();
    report!("num_queries", num_queries);

    benchmark("dijkstra", num_nodes, &dijkstra::Server::new(&graph), num_queries)?;
    benchmark("bidirectional_dijkstra", num_nodes, &bidirectional_dijkstra::Server::new(&graph), num_queries)?;
    benchmark("a_star", num_nodes, &a_star::Server::new(&graph), num_queries)?;
    benchmark("bidirectional_a_star", num_nodes, &sym_bidir_astar::Server::new(&graph), num_queries)?;
    benchmark("alt", num_nodes, &alt::Server::new(&graph, &landmarks)?, num_queries)?;
    benchmark("bidirectional_alt", num_nodes, &alt::BidirectionalServer::new(&graph, &landmarks)?, num_queries)?;
    benchmark("arc_flags", num_nodes, &arc_flags::query::dijkstra::Server::new(&flagged), num_queries)?;
    benchmark(
        "bidirectional_arc_flags",
        num_nodes,
        &arc_flags::query::bidirectional::Server::new(&flagged, &backward_flagged)?,
        num_queries,
    )?;
    benchmark("arc_flags_alt", num_nodes, &arc_flags::query::alt::Server::new(&flagged, &landmarks)?, num_queries)?;

    Ok(())
}
