use crate::config::BenchmarkConfig;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Column holding the scheduler reported by the simulator.
pub const SCHEDULER: &str = "scheduler";
/// Column holding the wall-clock duration of the simulator invocation, in seconds.
pub const BENCHMARK_TIME: &str = "benchmark_time";
/// Column holding the configured task count.
pub const TASKS_PARAM: &str = "tasks_param";
/// Column holding the configured simulation duration.
pub const DURATION_PARAM: &str = "duration_param";
/// Column holding the configured seed.
pub const SEED_PARAM: &str = "seed_param";

/// One row of the result table.
///
/// A row is the simulator's reported fields, in artifact column order, followed by the fields
/// contributed by the benchmark itself. Configuration fields carry a `_param` suffix so they
/// never shadow a field of the same base name reported by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    fields: Vec<(String, FieldValue)>,
}

impl RunResult {
    /// Merge the first data row of a simulator artifact with the configuration that produced it.
    pub fn from_simulator_row(
        config: &BenchmarkConfig,
        row: Vec<(String, FieldValue)>,
        elapsed: Duration,
    ) -> Self {
        let mut result = Self { fields: row };

        // Grouping needs a scheduler even if the simulator did not report one
        if result.get(SCHEDULER).is_none() {
            result.set(SCHEDULER, FieldValue::Text(config.scheduler.clone()));
        }

        result.set(BENCHMARK_TIME, FieldValue::Float(elapsed.as_secs_f64()));
        result.set(TASKS_PARAM, FieldValue::from(config.task_count));
        result.set(DURATION_PARAM, FieldValue::from(config.duration));
        result.set(SEED_PARAM, FieldValue::from(config.seed));

        result
    }

    /// Build a row from already merged fields, for example when loading a persisted table.
    pub fn from_fields(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The scheduler of this row, as reported by the simulator.
    pub fn scheduler(&self) -> Option<&str> {
        self.get(SCHEDULER).and_then(FieldValue::as_str)
    }

    /// The simulator-reported fields, excluding everything the benchmark added.
    pub fn simulator_fields(&self) -> impl Iterator<Item = &(String, FieldValue)> {
        self.fields.iter().filter(|(name, _)| {
            !matches!(
                name.as_str(),
                BENCHMARK_TIME | TASKS_PARAM | DURATION_PARAM | SEED_PARAM
            )
        })
    }

    fn set(&mut self, column: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }
}
