use crate::config::BenchmarkConfig;
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// The value sets a sweep is enumerated from.
///
/// Configurations are the Cartesian product of the four sets, nested with the scheduler outermost,
/// then task count, then duration, and the seed innermost. Progress reporting and tie-breaking
/// depend on this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigGrid {
    pub schedulers: Vec<String>,
    pub task_counts: Vec<u32>,
    pub durations: Vec<u64>,
    pub seeds: Vec<u64>,
}

impl ConfigGrid {
    /// The number of configurations in the grid.
    pub fn len(&self) -> usize {
        self.schedulers.len() * self.task_counts.len() * self.durations.len() * self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate the configurations of this grid in sweep order.
    pub fn configs(&self) -> impl Iterator<Item = BenchmarkConfig> + '_ {
        iproduct!(
            self.schedulers.iter(),
            self.task_counts.iter(),
            self.durations.iter(),
            self.seeds.iter()
        )
        .map(|(scheduler, &task_count, &duration, &seed)| {
            BenchmarkConfig::new(scheduler.clone(), task_count, duration, seed)
        })
    }
}
