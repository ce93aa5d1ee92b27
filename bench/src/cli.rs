use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use power_bench_runner::prelude::{
    CleanupPolicy, SweepMode, DEFAULT_SEED, DEFAULT_SIMULATOR_PATH, POWER_BENCH_SIMULATOR_ENV,
};

#[derive(Parser)]
#[command(about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct PowerBenchCli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarise a previously saved result table.
    Summarise {
        /// Path to the result table written by a sweep.
        csv: PathBuf,

        /// Also write the summary as JSON to this file.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show statistics per task type for a task-level artifact.
    Tasks {
        /// Path to a task-level CSV with `type` and `duration` columns.
        csv: PathBuf,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the simulator binary.
    ///
    /// A bare name is looked up on the `PATH`.
    #[arg(short, long, env = POWER_BENCH_SIMULATOR_ENV, default_value = DEFAULT_SIMULATOR_PATH)]
    pub binary: PathBuf,

    /// File to save the result table to.
    #[arg(short, long, default_value = "benchmark_results.csv")]
    pub output: PathBuf,

    /// Run the full parameter sweep over every scheduler, task count, duration and seed.
    #[arg(long, conflicts_with_all = ["scalability", "scheduler"])]
    pub sweep: bool,

    /// Run the scalability sweep over a wide range of task counts.
    #[arg(long, conflicts_with = "scheduler")]
    pub scalability: bool,

    /// Only benchmark this scheduler.
    #[arg(long)]
    pub scheduler: Option<String>,

    /// The number of tasks for a single scheduler or comparison run.
    #[arg(long, default_value_t = 50)]
    pub tasks: u32,

    /// The simulation duration for a single scheduler or comparison run.
    #[arg(long, default_value_t = 10000)]
    pub duration: u64,

    /// The seed for a single scheduler or comparison run.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// A TOML file whose `schedulers`, `task_counts`, `durations` and `seeds` replace the sets of
    /// the selected sweep.
    #[arg(long)]
    pub grid: Option<PathBuf>,

    /// Kill a simulator run after this many seconds and count it as failed.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// When to delete simulator artifacts: `remove-on-success`, `always` or `never`.
    #[arg(long, default_value_t = CleanupPolicy::default())]
    pub cleanup: CleanupPolicy,

    /// Directory the simulator writes its artifacts to.
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Also write the summary as JSON to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// An extra argument to pass to the simulator, may be given multiple times.
    #[arg(long = "sim-arg", allow_hyphen_values = true)]
    pub sim_args: Vec<String>,
}

impl RunArgs {
    pub fn mode(&self) -> SweepMode {
        if self.sweep {
            SweepMode::Full
        } else if self.scalability {
            SweepMode::Scalability
        } else if let Some(scheduler) = &self.scheduler {
            SweepMode::Single {
                scheduler: scheduler.clone(),
                task_count: self.tasks,
                duration: self.duration,
                seed: self.seed,
            }
        } else {
            SweepMode::Comparison {
                task_count: self.tasks,
                duration: self.duration,
                seed: self.seed,
            }
        }
    }
}
