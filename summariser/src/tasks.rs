use crate::analyze::round6;
use crate::model::TaskTypeStats;
use crate::partition::partition_by_column;
use polars::prelude::{col, lit, DataFrame, DataType, IntoLazy};
use power_bench_model::frame::has_column;
use thiserror::Error;

pub const TASK_TYPE: &str = "type";
pub const TASK_DURATION: &str = "duration";
pub const TURNAROUND_TIME: &str = "turnaround_time";

#[derive(Error, Debug)]
pub enum TaskStatsError {
    #[error("Not a task-level artifact, missing column: {column}")]
    MissingColumn { column: &'static str },
}

/// Statistics per task type over a task-level artifact, sorted by task type.
///
/// Turnaround is only averaged over tasks with a positive turnaround time, a task type without any
/// gets `None`, as does every type when the artifact has no turnaround column.
pub fn task_stats(frame: &DataFrame) -> anyhow::Result<Vec<TaskTypeStats>> {
    for column in [TASK_TYPE, TASK_DURATION] {
        if !has_column(frame, column) {
            return Err(TaskStatsError::MissingColumn { column }.into());
        }
    }

    let with_turnaround = has_column(frame, TURNAROUND_TIME);
    let frame = frame
        .clone()
        .lazy()
        .with_column(col(TASK_TYPE).cast(DataType::String))
        .collect()?;

    partition_by_column(&frame, TASK_TYPE)?
        .into_iter()
        .map(|(task_type, group)| -> anyhow::Result<TaskTypeStats> {
            let count = group.height();
            let mean_duration = group
                .column(TASK_DURATION)?
                .cast(&DataType::Float64)?
                .as_materialized_series().mean()
                .map(round6)
                .unwrap_or_default();

            let mean_turnaround = if with_turnaround {
                group
                    .lazy()
                    .select([col(TURNAROUND_TIME).cast(DataType::Float64)])
                    .filter(col(TURNAROUND_TIME).gt(lit(0.0)))
                    .collect()?
                    .column(TURNAROUND_TIME)?
                    .as_materialized_series().mean()
                    .map(round6)
            } else {
                None
            };

            Ok(TaskTypeStats {
                task_type,
                count,
                mean_duration,
                mean_turnaround,
            })
        })
        .collect()
}
