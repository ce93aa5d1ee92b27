use std::time::Instant;

use power_bench_model::{BenchmarkConfig, ConfigGrid, ResultStore, SweepSummary};

use crate::collect::collect;
use crate::executor::RunExecutor;
use crate::progress::SweepProgress;

/// Drives a whole sweep, one configuration at a time.
///
/// Runs never overlap: benchmark timings would be meaningless if simulators shared the machine.
pub struct Sweep {
    executor: RunExecutor,
    show_progress: bool,
}

/// Everything a finished sweep produced.
#[derive(Debug)]
pub struct SweepOutcome {
    pub summary: SweepSummary,
    pub results: ResultStore,
}

impl Sweep {
    pub fn new(executor: RunExecutor) -> Self {
        Self {
            executor,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run every configuration of the grid and collect the successful runs.
    pub fn run(&self, mode: impl ToString, grid: ConfigGrid) -> SweepOutcome {
        let mut summary = SweepSummary::new(
            nanoid::nanoid!(),
            mode.to_string(),
            chrono::Utc::now().timestamp(),
            grid,
        );
        let mut results = ResultStore::new();

        let total = summary.grid.len();
        log::info!(
            "Starting {} sweep {}: {total} total runs",
            summary.mode,
            summary.run_id
        );

        let mut progress = SweepProgress::new(total, self.show_progress);
        let configs = summary.grid.configs().collect::<Vec<_>>();
        for config in configs {
            progress.start_run(&config);
            let start_time = Instant::now();
            let success = self.run_single(&config, &mut results);
            progress.finish_run(&config, success, start_time.elapsed());
            summary.record_run(success);
        }
        progress.finish();

        log::info!(
            "Sweep {} completed: {} of {} runs succeeded",
            summary.run_id,
            summary.successful_runs,
            summary.attempted_runs
        );

        SweepOutcome { summary, results }
    }

    /// Run one configuration, appending its result to `results` if it succeeds.
    ///
    /// Failures are logged and reported as `false`, they are never propagated.
    pub fn run_single(&self, config: &BenchmarkConfig, results: &mut ResultStore) -> bool {
        let invocation = match self.executor.invoke(config) {
            Ok(invocation) => invocation,
            Err(e) => {
                log::warn!("Run failed for {config}: {e}");
                self.executor
                    .clean_up(&self.executor.artifact_path(config), false);
                return false;
            }
        };

        match collect(config, &invocation.artifact, invocation.elapsed) {
            Ok(result) => {
                results.push(result);
                self.executor.clean_up(&invocation.artifact, true);
                log::debug!(
                    "Completed {config} in {:.2}s",
                    invocation.elapsed.as_secs_f64()
                );
                true
            }
            Err(e) => {
                log::warn!("Run failed for {config}: {e}");
                self.executor.clean_up(&invocation.artifact, false);
                false
            }
        }
    }
}
