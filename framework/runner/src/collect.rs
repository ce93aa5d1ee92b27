use std::path::Path;
use std::time::Duration;

use power_bench_model::frame::{read_csv, row_fields};
use power_bench_model::{BenchmarkConfig, RunResult};

use crate::executor::RunFailure;

/// Turn a simulator artifact into a [`RunResult`].
///
/// The artifact is expected to hold a header row and at least one data row. Only the first data
/// row is used: the simulator writes one summary row per run. An artifact without data rows, or
/// one that cannot be parsed, is a failed run.
pub fn collect(
    config: &BenchmarkConfig,
    artifact: &Path,
    elapsed: Duration,
) -> Result<RunResult, RunFailure> {
    let failure = |reason: String| RunFailure::Collect {
        artifact: artifact.to_path_buf(),
        reason,
    };

    let frame = read_csv(artifact).map_err(|e| failure(format!("{e:#}")))?;
    if frame.height() == 0 {
        return Err(failure("the artifact has no data rows".to_string()));
    }
    if frame.height() > 1 {
        log::debug!(
            "Artifact {} has {} rows, using the first",
            artifact.display(),
            frame.height()
        );
    }

    let row = row_fields(&frame, 0).map_err(|e| failure(format!("{e:#}")))?;

    Ok(RunResult::from_simulator_row(config, row, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_bench_model::{FieldValue, BENCHMARK_TIME, TASKS_PARAM};

    #[test]
    fn collects_first_row_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let artifact = dir.path().join("run.csv");
        std::fs::write(
            &artifact,
            "scheduler,completed_tasks,total_energy_J\nRR,48,1.5\nRR,12,9.0\n",
        )?;

        let config = BenchmarkConfig::new("RR", 50, 10000, 42);
        let result = collect(&config, &artifact, Duration::from_secs(2))?;

        assert_eq!(result.get("completed_tasks"), Some(&FieldValue::Int(48)));
        assert_eq!(result.get(BENCHMARK_TIME), Some(&FieldValue::Float(2.0)));
        assert_eq!(result.get(TASKS_PARAM), Some(&FieldValue::Int(50)));

        Ok(())
    }

    #[test]
    fn header_only_artifact_is_a_failure() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let artifact = dir.path().join("run.csv");
        std::fs::write(&artifact, "scheduler,completed_tasks,total_energy_J\n")?;

        let config = BenchmarkConfig::new("RR", 50, 10000, 42);
        let result = collect(&config, &artifact, Duration::ZERO);

        assert!(matches!(result, Err(RunFailure::Collect { .. })));
        // Collecting never touches the artifact
        assert!(artifact.exists());

        Ok(())
    }

    #[test]
    fn empty_artifact_is_a_failure() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let artifact = dir.path().join("run.csv");
        std::fs::write(&artifact, "")?;

        let config = BenchmarkConfig::new("RR", 50, 10000, 42);
        assert!(collect(&config, &artifact, Duration::ZERO).is_err());

        Ok(())
    }
}
