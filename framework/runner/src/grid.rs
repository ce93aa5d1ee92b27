use std::fmt::{Display, Formatter};
use std::path::Path;

use anyhow::Context;
use power_bench_model::ConfigGrid;
use serde::Deserialize;

/// The schedulers known to the simulator.
pub const SCHEDULERS: [&str; 4] = ["RR", "Priority", "FCFS", "DVFS"];

/// The seed used by the scalability sweep, and the default for single and comparison runs.
pub const DEFAULT_SEED: u64 = 42;

const SWEEP_TASK_COUNTS: [u32; 4] = [25, 50, 100, 200];
const SWEEP_DURATIONS: [u64; 3] = [5000, 10000, 20000];
const SWEEP_SEEDS: [u64; 3] = [42, 123, 456];

const SCALABILITY_TASK_COUNTS: [u32; 7] = [10, 25, 50, 100, 200, 500, 1000];
const SCALABILITY_DURATION: u64 = 20000;

/// The kind of sweep to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepMode {
    /// Every scheduler, task count, duration and seed, for statistical repeatability.
    Full,
    /// Every scheduler over a wide range of task counts, with a single duration and seed.
    Scalability,
    /// One named scheduler at the given task count, duration and seed.
    Single {
        scheduler: String,
        task_count: u32,
        duration: u64,
        seed: u64,
    },
    /// Every scheduler at the given task count, duration and seed.
    Comparison {
        task_count: u32,
        duration: u64,
        seed: u64,
    },
}

impl SweepMode {
    /// The default grid for this mode.
    pub fn grid(&self) -> ConfigGrid {
        match self {
            SweepMode::Full => ConfigGrid {
                schedulers: all_schedulers(),
                task_counts: SWEEP_TASK_COUNTS.to_vec(),
                durations: SWEEP_DURATIONS.to_vec(),
                seeds: SWEEP_SEEDS.to_vec(),
            },
            SweepMode::Scalability => ConfigGrid {
                schedulers: all_schedulers(),
                task_counts: SCALABILITY_TASK_COUNTS.to_vec(),
                durations: vec![SCALABILITY_DURATION],
                seeds: vec![DEFAULT_SEED],
            },
            SweepMode::Single {
                scheduler,
                task_count,
                duration,
                seed,
            } => ConfigGrid {
                schedulers: vec![scheduler.clone()],
                task_counts: vec![*task_count],
                durations: vec![*duration],
                seeds: vec![*seed],
            },
            SweepMode::Comparison {
                task_count,
                duration,
                seed,
            } => ConfigGrid {
                schedulers: all_schedulers(),
                task_counts: vec![*task_count],
                durations: vec![*duration],
                seeds: vec![*seed],
            },
        }
    }
}

impl Display for SweepMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepMode::Full => write!(f, "sweep"),
            SweepMode::Scalability => write!(f, "scalability"),
            SweepMode::Single { .. } => write!(f, "single"),
            SweepMode::Comparison { .. } => write!(f, "comparison"),
        }
    }
}

fn all_schedulers() -> Vec<String> {
    SCHEDULERS.iter().map(|s| s.to_string()).collect()
}

/// Overrides for a sweep grid, loaded from a TOML file.
///
/// Each key that is present replaces the corresponding set of the mode's grid. For example:
///
/// ```toml
/// schedulers = ["RR", "DVFS"]
/// seeds = [1, 2, 3, 4, 5]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridFile {
    pub schedulers: Option<Vec<String>>,
    pub task_counts: Option<Vec<u32>>,
    pub durations: Option<Vec<u64>>,
    pub seeds: Option<Vec<u64>>,
}

impl GridFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid grid file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the overrides to a grid.
    pub fn apply(self, grid: ConfigGrid) -> ConfigGrid {
        ConfigGrid {
            schedulers: self.schedulers.unwrap_or(grid.schedulers),
            task_counts: self.task_counts.unwrap_or(grid.task_counts),
            durations: self.durations.unwrap_or(grid.durations),
            seeds: self.seeds.unwrap_or(grid.seeds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_bench_model::BenchmarkConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_sweep_covers_every_combination() {
        let grid = SweepMode::Full.grid();
        assert_eq!(grid.len(), 4 * 4 * 3 * 3);

        let configs = grid.configs().collect::<Vec<_>>();
        assert_eq!(configs.len(), 144);
        assert_eq!(configs[0], BenchmarkConfig::new("RR", 25, 5000, 42));
        assert_eq!(configs[1], BenchmarkConfig::new("RR", 25, 5000, 123));
        assert_eq!(configs[143], BenchmarkConfig::new("DVFS", 200, 20000, 456));
    }

    #[test]
    fn scalability_fixes_duration_and_seed() {
        let grid = SweepMode::Scalability.grid();
        assert_eq!(grid.len(), 4 * 7);
        assert!(grid
            .configs()
            .all(|c| c.duration == 20000 && c.seed == DEFAULT_SEED));
    }

    #[test]
    fn single_runs_one_configuration() {
        let grid = SweepMode::Single {
            scheduler: "DVFS".to_string(),
            task_count: 75,
            duration: 15000,
            seed: DEFAULT_SEED,
        }
        .grid();

        assert_eq!(
            grid.configs().collect::<Vec<_>>(),
            vec![BenchmarkConfig::new("DVFS", 75, 15000, 42)]
        );
    }

    #[test]
    fn comparison_runs_every_scheduler_once() {
        let grid = SweepMode::Comparison {
            task_count: 50,
            duration: 10000,
            seed: 7,
        }
        .grid();

        let schedulers = grid.configs().map(|c| c.scheduler).collect::<Vec<_>>();
        assert_eq!(schedulers, vec!["RR", "Priority", "FCFS", "DVFS"]);
        assert!(grid.configs().all(|c| c.seed == 7));
    }

    #[test]
    fn grid_file_overrides_only_present_keys() -> anyhow::Result<()> {
        let overrides = GridFile::parse(
            r#"
            schedulers = ["RR", "DVFS"]
            seeds = [1, 2]
            "#,
        )?;

        let grid = overrides.apply(SweepMode::Full.grid());
        assert_eq!(grid.schedulers, vec!["RR", "DVFS"]);
        assert_eq!(grid.task_counts, vec![25, 50, 100, 200]);
        assert_eq!(grid.durations, vec![5000, 10000, 20000]);
        assert_eq!(grid.seeds, vec![1, 2]);

        Ok(())
    }

    #[test]
    fn grid_file_rejects_unknown_keys() {
        assert!(GridFile::parse("scheduler = [\"RR\"]").is_err());
    }
}
