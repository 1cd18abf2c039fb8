// Partition an fmi graph and compute arc flags.
//
// Usage: arc_flags <graph.fmi> <output.fmi> [grid|kd] [kd depth]
// The pool width can be set through ARC_FLAG_WORKERS.

#[macro_use]
extern crate ocean_router;
use ocean_router::{
    algo::{
        arc_flags::{compute_arc_flags, ArcFlagConfig},
        partitioning::{Partitioning, MAX_KD_DEPTH},
    },
    cli::*,
    datastr::graph::*,
    io::*,
    report::*,
};
use std::{env, error::Error};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let _reporter = enable_reporting("arc_flags");

    let mut args = env::args().skip(1);
    let input = next_arg(&mut args, "No input graph given")?;
    let output = next_arg(&mut args, "No output path given")?;
    let partitioning = match args.next().as_deref() {
        None | Some("grid") => Partitioning::Grid,
        Some("kd") => Partitioning::Kd {
            depth: parse_optional_arg(&mut args, "Invalid kd depth")?.unwrap_or(MAX_KD_DEPTH),
        },
        Some(_) => return Err(Box::new(CliErr("Unknown partitioning, use grid or kd"))),
    };
    let config = ArcFlagConfig::default();
    report!("partitioning", format!("{:?}", partitioning));
    report!("num_workers", config.num_workers);

    let graph = report_time_with_key("reading graph", "read_ms", || read_fmi_file(&input))?;
    report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs() });

    let partitioned = report_time_with_key("partitioning", "partitioning_ms", || partitioning.partition(&graph))?;
    let flagged = report_time_with_key("arc flag computation", "arc_flags_ms", || compute_arc_flags(partitioned, &config))?;
    report_time_with_key("writing graph", "write_ms", || write_partitioned_fmi_file(&flagged, &output))?;

    Ok(())
}
