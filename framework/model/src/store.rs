use crate::frame::{read_csv, row_fields, write_csv};
use crate::result::RunResult;
use crate::value::FieldValue;
use itertools::Itertools;
use polars::prelude::{Column, DataFrame};
use std::path::Path;

/// The ordered table of successful runs for one sweep.
///
/// Rows are appended in execution order and never updated or removed. The order matters: ties
/// between rows during summarising are resolved in favour of the earlier row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    rows: Vec<RunResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to the end of the table.
    pub fn push(&mut self, result: RunResult) {
        self.rows.push(result);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RunResult] {
        &self.rows
    }

    /// The union of all row columns, in the order they were first seen.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.column_names())
            .unique()
            .map(|name| name.to_string())
            .collect()
    }

    /// Convert the table into a [`DataFrame`].
    ///
    /// Each column is typed from the values it holds: all integers become `Int64`, numbers with at
    /// least one float become `Float64` and anything else becomes `String`. Cells missing from a
    /// row are null.
    pub fn to_data_frame(&self) -> anyhow::Result<DataFrame> {
        let columns = self
            .columns()
            .into_iter()
            .map(|name| {
                let cells = self
                    .rows
                    .iter()
                    .map(|row| row.get(&name))
                    .collect::<Vec<_>>();
                build_column(&name, &cells)
            })
            .collect::<Vec<_>>();

        Ok(DataFrame::new(columns)?)
    }

    /// Persist the full table as CSV.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut frame = self.to_data_frame()?;
        write_csv(&mut frame, path)?;
        log::debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a table previously written with [`ResultStore::write_csv`].
    pub fn load_csv(path: &Path) -> anyhow::Result<Self> {
        let frame = read_csv(path)?;
        let rows = (0..frame.height())
            .map(|row_idx| row_fields(&frame, row_idx).map(RunResult::from_fields))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { rows })
    }
}

impl FromIterator<RunResult> for ResultStore {
    fn from_iter<T: IntoIterator<Item = RunResult>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

fn build_column(name: &str, cells: &[Option<&FieldValue>]) -> Column {
    let present = cells.iter().flatten();
    let all_int = present.clone().all(|v| matches!(v, FieldValue::Int(_)));
    let all_numeric = present.clone().all(|v| v.as_f64().is_some());

    if all_int {
        let values = cells
            .iter()
            .map(|cell| cell.and_then(FieldValue::as_i64))
            .collect::<Vec<_>>();
        Column::new(name.into(), values)
    } else if all_numeric {
        let values = cells
            .iter()
            .map(|cell| cell.and_then(FieldValue::as_f64))
            .collect::<Vec<_>>();
        Column::new(name.into(), values)
    } else {
        let values = cells
            .iter()
            .map(|cell| cell.map(|v| v.to_string()))
            .collect::<Vec<_>>();
        Column::new(name.into(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchmarkConfig;
    use polars::prelude::DataType;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn result(scheduler: &str, energy: FieldValue, extra: Option<(&str, i64)>) -> RunResult {
        let mut row = vec![
            ("scheduler".to_string(), FieldValue::from(scheduler)),
            ("total_energy_J".to_string(), energy),
        ];
        if let Some((name, value)) = extra {
            row.push((name.to_string(), FieldValue::Int(value)));
        }
        RunResult::from_simulator_row(
            &BenchmarkConfig::new(scheduler, 10, 100, 42),
            row,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn columns_are_the_union_in_first_seen_order() {
        let store = ResultStore::from_iter([
            result("RR", FieldValue::Int(5), None),
            result("FCFS", FieldValue::Int(3), Some(("migrations", 2))),
        ]);

        assert_eq!(
            store.columns(),
            vec![
                "scheduler",
                "total_energy_J",
                "benchmark_time",
                "tasks_param",
                "duration_param",
                "seed_param",
                "migrations",
            ]
        );
    }

    #[test]
    fn data_frame_types_follow_values() -> anyhow::Result<()> {
        let store = ResultStore::from_iter([
            result("RR", FieldValue::Int(5), None),
            result("FCFS", FieldValue::Float(3.5), Some(("migrations", 2))),
        ]);

        let frame = store.to_data_frame()?;
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column("scheduler")?.dtype(), &DataType::String);
        assert_eq!(frame.column("total_energy_J")?.dtype(), &DataType::Float64);
        assert_eq!(frame.column("tasks_param")?.dtype(), &DataType::Int64);
        assert_eq!(frame.column("migrations")?.null_count(), 1);

        Ok(())
    }

    #[test]
    fn persisted_table_loads_back_in_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("benchmark_results.csv");

        let store = ResultStore::from_iter([
            result("RR", FieldValue::Float(5.25), None),
            result("FCFS", FieldValue::Float(3.5), None),
        ]);
        store.write_csv(&path)?;

        let loaded = ResultStore::load_csv(&path)?;
        assert_eq!(loaded, store);

        Ok(())
    }
}
