use crate::model::{GroupAverage, SummaryRecord, TaskTypeStats};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct BestRow<'a> {
    metric: &'a str,
    scheduler: &'a str,
    #[tabled(display = "float2")]
    value: f64,
    #[tabled(display = "optional")]
    tasks: Option<i64>,
    #[tabled(display = "optional")]
    duration: Option<i64>,
}

#[derive(Tabled)]
struct TaskRow<'a> {
    #[tabled(rename = "type")]
    task_type: &'a str,
    count: usize,
    #[tabled(display = "float2")]
    mean_duration: f64,
    #[tabled(display = "optional_float2")]
    mean_turnaround: Option<f64>,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

fn optional(n: &Option<i64>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

fn optional_float2(n: &Option<f64>) -> String {
    n.as_ref().map(float2).unwrap_or_else(|| "-".to_string())
}

/// The best run per metric.
pub fn best_table(records: &[SummaryRecord]) -> Table {
    let rows = records.iter().map(|record| BestRow {
        metric: &record.metric_label,
        scheduler: &record.winning_config_scheduler,
        value: record.winning_value,
        tasks: record.winning_task_count,
        duration: record.winning_duration,
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}

/// Per-scheduler means, one column per averaged metric.
///
/// The columns are the union of the averaged columns in first-seen order, a scheduler with no
/// mean for a column shows `-`.
pub fn averages_table(averages: &[GroupAverage]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for (column, _) in averages.iter().flat_map(|group| &group.means) {
        if !columns.contains(&column.as_str()) {
            columns.push(column);
        }
    }

    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("scheduler").chain(columns.iter().copied()).map(String::from),
    );
    for group in averages {
        builder.push_record(
            std::iter::once(group.scheduler.clone()).chain(columns.iter().map(|column| {
                group
                    .mean(column)
                    .map(|mean| mean.to_string())
                    .unwrap_or_else(|| "-".to_string())
            })),
        );
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table
}

/// Statistics per task type.
pub fn task_table(stats: &[TaskTypeStats]) -> Table {
    let rows = stats.iter().map(|stats| TaskRow {
        task_type: &stats.task_type,
        count: stats.count,
        mean_duration: stats.mean_duration,
        mean_turnaround: stats.mean_turnaround,
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}
