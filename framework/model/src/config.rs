use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One point of a benchmark sweep.
///
/// Configurations are produced by the grid and consumed immediately by the executor. They are
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// The scheduler identifier passed to the simulator, e.g. `RR` or `DVFS`
    pub scheduler: String,
    /// The number of tasks to simulate
    pub task_count: u32,
    /// The total simulated duration, in ticks
    pub duration: u64,
    /// The random seed used by the simulator's task generator
    pub seed: u64,
}

impl BenchmarkConfig {
    pub fn new(scheduler: impl Into<String>, task_count: u32, duration: u64, seed: u64) -> Self {
        Self {
            scheduler: scheduler.into(),
            task_count,
            duration,
            seed,
        }
    }

    /// The file name of the transient per-run artifact for this configuration.
    ///
    /// The name is derived from all four fields so that runs sharing a working directory never
    /// write to the same file. Characters of the scheduler name that are not safe in a single
    /// path component are replaced with `_`.
    pub fn artifact_name(&self) -> String {
        let scheduler = self
            .scheduler
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();

        format!(
            "benchmark_{scheduler}_{}t_{}d_{}s.csv",
            self.task_count, self.duration, self.seed
        )
    }
}

impl Display for BenchmarkConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} with {} tasks, {} duration, seed {}",
            self.scheduler, self.task_count, self.duration, self.seed
        )
    }
}
