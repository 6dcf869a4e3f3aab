//! CLI entry point: `simulator <input_trace> <output_csv> [--json PATH] [-v]`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fp_pipeline_sim::metrics::RunSummary;
use fp_pipeline_sim::output::{write_csv, write_json};
use fp_pipeline_sim::simulator::run;
use fp_pipeline_sim::trace::parse_trace_file;

/// Discrete-event simulator for an in-order pipelined floating-point unit.
#[derive(Parser, Debug)]
#[command(name = "simulator")]
struct Args {
    /// Path to the input trace file.
    trace: PathBuf,
    /// Path the retired schedule CSV is written to.
    output: PathBuf,
    /// Also emit the schedule as JSON (auxiliary, §6.2).
    #[arg(long)]
    json: Option<PathBuf>,
    /// Raise log verbosity (stacks: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let instructions = parse_trace_file(&args.trace)
        .with_context(|| format!("failed to parse trace {}", args.trace.display()))?;

    let outcome = run(&instructions);
    let summary = RunSummary::from_outcome(&outcome);
    info!(
        retired = summary.retired_count,
        final_cycle = summary.final_cycle,
        terminated_early = summary.terminated_early,
        "simulation finished"
    );

    write_csv(&args.output, &outcome.retired)
        .with_context(|| format!("failed to write CSV to {}", args.output.display()))?;

    if let Some(json_path) = &args.json {
        write_json(json_path, &outcome.retired)
            .with_context(|| format!("failed to write JSON to {}", json_path.display()))?;
    }

    Ok(())
}
