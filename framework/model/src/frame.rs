use crate::value::FieldValue;
use anyhow::Context;
use polars::prelude::*;
use std::path::Path;

/// Read a CSV file with a header row into a [`DataFrame`].
pub fn read_csv(path: &Path) -> anyhow::Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse {} as CSV", path.display()))
}

/// Write a [`DataFrame`] to a CSV file with a header row, replacing any existing file.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read one row of a [`DataFrame`] as ordered `(column, value)` pairs.
///
/// Null cells are left out of the row.
pub fn row_fields(frame: &DataFrame, row_idx: usize) -> anyhow::Result<Vec<(String, FieldValue)>> {
    let mut fields = Vec::with_capacity(frame.width());
    for column in frame.get_columns() {
        let value = column
            .get(row_idx)
            .with_context(|| format!("Row {row_idx} of column {}", column.name()))?;
        if let Some(value) = FieldValue::from_any_value(value) {
            fields.push((column.name().to_string(), value));
        }
    }
    Ok(fields)
}

/// Whether the frame has a column with the given name.
pub fn has_column(frame: &DataFrame, column: &str) -> bool {
    frame
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_header_and_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("run.csv");
        std::fs::write(
            &path,
            "scheduler,total_tasks,total_energy_J\nRR,50,1.500000\nRR,60,2.000000\n",
        )?;

        let frame = read_csv(&path)?;
        assert_eq!(frame.height(), 2);
        assert!(has_column(&frame, "total_energy_J"));
        assert!(!has_column(&frame, "peak_temp_C"));

        assert_eq!(
            row_fields(&frame, 0)?,
            vec![
                ("scheduler".to_string(), FieldValue::from("RR")),
                ("total_tasks".to_string(), FieldValue::Int(50)),
                ("total_energy_J".to_string(), FieldValue::Float(1.5)),
            ]
        );

        Ok(())
    }

    #[test]
    fn header_only_file_has_no_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "scheduler,total_tasks\n")?;

        let frame = read_csv(&path)?;
        assert_eq!(frame.height(), 0);

        Ok(())
    }
}
