mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use power_bench_runner::prelude::{simulator_path, GridFile, RunExecutor, Sweep};
use power_bench_summariser::{print_summary, table, task_stats, write_report, SummaryEngine};

use crate::cli::{Command, PowerBenchCli, RunArgs};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = PowerBenchCli::parse();

    match cli.command {
        Some(Command::Summarise { csv, report }) => summarise(&csv, report.as_deref()),
        Some(Command::Tasks { csv }) => tasks(&csv),
        None => run(cli.run),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let simulator = simulator_path(&args.binary).inspect_err(|e| {
        log::error!("Simulator '{}' not found: {e:?}", args.binary.display());
    })?;
    log::info!("Using simulator at {}", simulator.display());

    let mode = args.mode();
    let mut grid = mode.grid();
    if let Some(path) = &args.grid {
        grid = GridFile::load(path)?.apply(grid);
    }

    let executor = RunExecutor::new(simulator)
        .with_work_dir(args.work_dir.clone())
        .with_timeout(args.timeout.map(Duration::from_secs))
        .with_cleanup(args.cleanup)
        .with_extra_args(args.sim_args.clone());

    let outcome = Sweep::new(executor)
        .with_progress(!args.no_progress)
        .run(&mode, grid);

    println!(
        "\nSweep completed: {} of {} runs succeeded",
        outcome.summary.successful_runs, outcome.summary.attempted_runs
    );

    if outcome.results.is_empty() {
        println!("No results to save");
        return Ok(());
    }

    outcome
        .results
        .write_csv(&args.output)
        .with_context(|| format!("Failed to save results to {}", args.output.display()))?;
    println!("Results saved to {}", args.output.display());

    let output = SummaryEngine::default()
        .summarise(&outcome.results)?
        .with_sweep(outcome.summary);
    print_summary(&output);

    if let Some(report) = &args.report {
        write_report(&output, report)?;
        println!("\nSummary report saved to {}", report.display());
    }

    println!("\nTo summarise these results again, run:");
    println!("power-bench summarise {}", args.output.display());

    Ok(())
}

fn summarise(csv: &Path, report: Option<&Path>) -> anyhow::Result<()> {
    let output = SummaryEngine::default()
        .summarise_csv(csv)
        .with_context(|| format!("Failed to summarise {}", csv.display()))?;
    print_summary(&output);

    if let Some(report) = report {
        write_report(&output, report)?;
        println!("\nSummary report saved to {}", report.display());
    }

    Ok(())
}

fn tasks(csv: &Path) -> anyhow::Result<()> {
    let frame = power_bench_model::frame::read_csv(csv)?;
    let stats = task_stats(&frame).with_context(|| format!("Failed to analyse {}", csv.display()))?;

    println!("\nTasks per type");
    println!("{}", table::task_table(&stats));

    Ok(())
}
