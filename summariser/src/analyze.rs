use crate::model::{GroupAverage, MetricSpec, SummaryRecord};
use crate::partition::partition_by_column;
use anyhow::Context;
use polars::frame::DataFrame;
use polars::prelude::{AnyValue, DataType};
use power_bench_model::frame::has_column;
use power_bench_model::{DURATION_PARAM, SCHEDULER, TASKS_PARAM};

/// Pick the best row for each metric.
///
/// Rows are scanned in table order and a later row only wins if it is strictly better, so ties go
/// to the earliest row. Null and NaN cells are ignored. Metrics whose column is missing, or holds
/// no values, are skipped.
pub(crate) fn best_per_metric(
    frame: &DataFrame,
    metrics: &[MetricSpec],
) -> anyhow::Result<Vec<SummaryRecord>> {
    let mut records = Vec::with_capacity(metrics.len());

    for metric in metrics {
        if !has_column(frame, &metric.column) {
            log::debug!("Skipping {}, no column {}", metric.label, metric.column);
            continue;
        }

        let Some((row_idx, value)) = best_row(frame, metric)? else {
            log::debug!("Skipping {}, no values in {}", metric.label, metric.column);
            continue;
        };

        records.push(SummaryRecord {
            metric_label: metric.label.clone(),
            winning_config_scheduler: cell_string(frame, SCHEDULER, row_idx)?.unwrap_or_default(),
            winning_value: value,
            winning_task_count: cell_i64(frame, TASKS_PARAM, row_idx)?,
            winning_duration: cell_i64(frame, DURATION_PARAM, row_idx)?,
        });
    }

    Ok(records)
}

fn best_row(frame: &DataFrame, metric: &MetricSpec) -> anyhow::Result<Option<(usize, f64)>> {
    let column = metric.column.as_str();
    let values = frame
        .column(column)?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column {column} is not numeric"))?;

    let mut best: Option<(usize, f64)> = None;
    for (row_idx, value) in values.f64()?.into_iter().enumerate() {
        let Some(value) = value.filter(|v| !v.is_nan()) else {
            continue;
        };
        match best {
            Some((_, current)) if !metric.direction.beats(value, current) => {}
            _ => best = Some((row_idx, value)),
        }
    }

    Ok(best)
}

/// Mean of each column per scheduler, rounded to 6 decimal places.
///
/// Only schedulers present in the table get a group, in scheduler name order. Columns that are
/// missing from the table are skipped.
pub(crate) fn scheduler_averages(
    frame: &DataFrame,
    columns: &[String],
) -> anyhow::Result<Vec<GroupAverage>> {
    if !has_column(frame, SCHEDULER) {
        log::debug!("No {SCHEDULER} column, no averages to compute");
        return Ok(Vec::new());
    }

    let present = columns
        .iter()
        .filter(|column| has_column(frame, column))
        .collect::<Vec<_>>();

    partition_by_column(frame, SCHEDULER)?
        .into_iter()
        .map(|(scheduler, group)| -> anyhow::Result<GroupAverage> {
            let mut means = Vec::with_capacity(present.len());
            for &column in &present {
                let values = group.column(column)?.cast(&DataType::Float64)?;
                if let Some(mean) = values.as_materialized_series().mean() {
                    means.push((column.clone(), round6(mean)));
                }
            }
            Ok(GroupAverage { scheduler, means })
        })
        .collect()
}

/// Round to 6 decimal places.
pub(crate) fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

fn cell_string(frame: &DataFrame, column: &str, row_idx: usize) -> anyhow::Result<Option<String>> {
    if !has_column(frame, column) {
        return Ok(None);
    }
    Ok(match frame.column(column)?.get(row_idx)? {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.into_string()),
        other => Some(other.to_string()),
    })
}

fn cell_i64(frame: &DataFrame, column: &str, row_idx: usize) -> anyhow::Result<Option<i64>> {
    if !has_column(frame, column) {
        return Ok(None);
    }
    Ok(frame.column(column)?.get(row_idx)?.extract::<i64>())
}
