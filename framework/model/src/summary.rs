use crate::grid::ConfigGrid;
use serde::{Deserialize, Serialize};
use sha3::Digest;

/// Summary of one sweep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepSummary {
    /// The unique sweep id
    ///
    /// Chosen by the orchestrator. Unique for each invocation.
    pub run_id: String,
    /// The name of the sweep mode, e.g. `sweep`, `scalability` or `comparison`
    pub mode: String,
    /// The time the sweep started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The grid the sweep was enumerated from
    pub grid: ConfigGrid,
    /// The number of runs that were attempted
    pub attempted_runs: usize,
    /// The number of runs that produced a row in the result table
    ///
    /// This is at most [SweepSummary::attempted_runs]. Failed runs never produce a row.
    pub successful_runs: usize,
}

impl SweepSummary {
    /// Create a new sweep summary with no runs attempted yet
    pub fn new(run_id: String, mode: String, started_at: i64, grid: ConfigGrid) -> Self {
        Self {
            run_id,
            mode,
            started_at,
            grid,
            attempted_runs: 0,
            successful_runs: 0,
        }
    }

    /// Record the outcome of one run
    pub fn record_run(&mut self, success: bool) {
        self.attempted_runs += 1;
        if success {
            self.successful_runs += 1;
        }
    }

    pub fn failed_runs(&self) -> usize {
        self.attempted_runs - self.successful_runs
    }

    /// Compute a fingerprint for the configuration space of this sweep
    ///
    /// Two sweeps over the same grid have the same fingerprint, regardless of the run id, start
    /// time or outcome. It uses the
    ///     - Schedulers
    ///     - Task counts
    ///     - Durations
    ///     - Seeds
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        for scheduler in &self.grid.schedulers {
            Digest::update(&mut hasher, scheduler.as_bytes());
            Digest::update(&mut hasher, [0u8]);
        }
        for task_count in &self.grid.task_counts {
            Digest::update(&mut hasher, task_count.to_le_bytes());
        }
        Digest::update(&mut hasher, [0xffu8]);
        for duration in &self.grid.durations {
            Digest::update(&mut hasher, duration.to_le_bytes());
        }
        Digest::update(&mut hasher, [0xffu8]);
        for seed in &self.grid.seeds {
            Digest::update(&mut hasher, seed.to_le_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}
