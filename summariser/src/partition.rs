use polars::prelude::{col, lit, AnyValue, DataFrame, IntoLazy, UniqueKeepStrategy};
use std::collections::BTreeMap;

/// Partition the [`DataFrame`] by the unique values of a single column.
///
/// Values in the column MUST be in String format. Rows with a null or non-string value are left
/// out of every partition.
///
/// Returns the sub-DataFrame for each unique value as a [`BTreeMap`] keyed by that value, so
/// partitions iterate in value order. Only values that occur in the frame get a partition.
pub fn partition_by_column(
    data_frame: &DataFrame,
    column: &str,
) -> anyhow::Result<BTreeMap<String, DataFrame>> {
    if column.is_empty() {
        return Err(anyhow::anyhow!("Cannot partition by an empty column name"));
    }

    let selectors = data_frame
        .clone()
        .lazy()
        .select([col(column)])
        .unique(Some(vec![column.to_string()]), UniqueKeepStrategy::Any)
        .collect()?;

    let mut partitioned = BTreeMap::new();

    for row_idx in 0..selectors.height() {
        let value = match selectors.column(column)?.get(row_idx) {
            Ok(AnyValue::String(s)) => s.to_string(),
            Ok(AnyValue::StringOwned(s)) => s.into_string(),
            Ok(AnyValue::Null) => continue,
            Ok(v) => {
                log::warn!("In column {column}, found non String value: {v:?}");
                continue;
            }
            Err(e) => {
                log::error!("In column {column}: {e}");
                continue;
            }
        };

        log::debug!("Partition for {column}={value}");

        let filtered = data_frame
            .clone()
            .lazy()
            .filter(col(column).eq(lit(value.clone())))
            .collect()?;

        partitioned.insert(value, filtered);
    }

    Ok(partitioned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    // Helper to create a test DataFrame with a scheduler column
    fn create_test_dataframe() -> DataFrame {
        df! [
            "scheduler" => ["RR", "RR", "FCFS", "FCFS", "RR", "DVFS"],
            "value"     => [1.,   2.,   3.,     4.,     5.,   6.],
            "numeric"   => [6,    5,    4,      3,      2,    1],
        ]
        .unwrap()
    }

    #[test]
    fn test_partition_with_nonexistent_column() {
        let df = create_test_dataframe();
        assert!(partition_by_column(&df, "nonexistent").is_err());
    }

    #[test]
    fn test_partition_with_empty_column() {
        let df = create_test_dataframe();
        assert!(partition_by_column(&df, "").is_err());
    }

    #[test]
    fn test_partition_by_scheduler() -> anyhow::Result<()> {
        let df = create_test_dataframe();
        let partitioned = partition_by_column(&df, "scheduler")?;

        // Should have 3 groups, iterated in value order
        assert_eq!(
            partitioned.keys().cloned().collect::<Vec<_>>(),
            vec!["DVFS", "FCFS", "RR"]
        );
        assert_eq!(partitioned["RR"].height(), 3);
        assert_eq!(partitioned["FCFS"].height(), 2);
        assert_eq!(partitioned["DVFS"].height(), 1);

        // Check that the "RR" group keeps its rows in order
        let values: Vec<f64> = partitioned["RR"]
            .column("value")?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(values, vec![1., 2., 5.]);

        Ok(())
    }

    #[test]
    fn test_partition_by_numeric_column_is_empty() -> anyhow::Result<()> {
        let df = create_test_dataframe();
        let partitioned = partition_by_column(&df, "numeric")?;
        assert!(partitioned.is_empty());

        Ok(())
    }
}
