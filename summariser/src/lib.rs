use crate::model::{Direction, MetricSpec, RadarMetric, SummaryOutput};
use anyhow::Context;
use polars::frame::DataFrame;
use power_bench_model::{ResultStore, BENCHMARK_TIME};
use std::path::Path;

mod analyze;
pub mod model;
mod normalize;
mod partition;
pub mod table;
mod tasks;

pub use normalize::normalize;
pub use partition::partition_by_column;
pub use tasks::{task_stats, TaskStatsError};

/// Computes the cross-run summaries of a result table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEngine {
    pub metrics: Vec<MetricSpec>,
    pub average_columns: Vec<String>,
    pub radar_metrics: Vec<RadarMetric>,
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricSpec::new("Energy Efficiency", "total_energy_J", Direction::Minimize),
                MetricSpec::new("Execution Speed", "execution_time_ticks", Direction::Minimize),
                MetricSpec::new("Thermal Performance", "peak_temp_C", Direction::Minimize),
                MetricSpec::new("Task Completion", "completed_tasks", Direction::Maximize),
            ],
            average_columns: [
                "total_energy_J",
                "execution_time_ticks",
                "peak_temp_C",
                "completed_tasks",
                BENCHMARK_TIME,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            radar_metrics: vec![
                RadarMetric::new("total_energy_J", "Energy", true),
                RadarMetric::new("execution_time_ticks", "Exec Time", true),
                RadarMetric::new("peak_temp_C", "Peak Temp", true),
                RadarMetric::new("average_power_W", "Avg Power", true),
            ],
        }
    }
}

impl SummaryEngine {
    /// Summarise the rows collected by a sweep.
    pub fn summarise(&self, results: &ResultStore) -> anyhow::Result<SummaryOutput> {
        let frame = results
            .to_data_frame()
            .context("Failed to build a table from the results")?;
        self.summarise_frame(&frame)
    }

    /// Summarise a previously persisted result table.
    pub fn summarise_csv(&self, path: &Path) -> anyhow::Result<SummaryOutput> {
        let frame = power_bench_model::frame::read_csv(path)?;
        self.summarise_frame(&frame)
    }

    pub fn summarise_frame(&self, frame: &DataFrame) -> anyhow::Result<SummaryOutput> {
        log::debug!(
            "Summarising {} rows with columns {:?}",
            frame.height(),
            frame.get_column_names()
        );

        let best = analyze::best_per_metric(frame, &self.metrics).context("Best per metric")?;

        let averages = analyze::scheduler_averages(frame, &self.average_columns)
            .context("Scheduler averages")?;

        let radar_columns = self
            .radar_metrics
            .iter()
            .map(|metric| metric.column.clone())
            .collect::<Vec<_>>();
        let radar_means =
            analyze::scheduler_averages(frame, &radar_columns).context("Radar comparison set")?;
        let (radar_metrics, rows) = normalize::comparison_rows(&self.radar_metrics, &radar_means);
        let radar = if radar_metrics.is_empty() || rows.is_empty() {
            log::debug!("No radar metrics with values, skipping normalization");
            None
        } else {
            Some(normalize(&radar_metrics, &rows))
        };

        Ok(SummaryOutput {
            sweep: None,
            fingerprint: None,
            best,
            averages,
            radar,
        })
    }
}

/// Write the summary as pretty printed JSON.
pub fn write_report(output: &SummaryOutput, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, output)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    log::info!("Wrote summary report to {}", path.display());
    Ok(())
}

/// Print the summary tables to stdout.
pub fn print_summary(output: &SummaryOutput) {
    println!("\nBest configuration per metric");
    println!("{}", table::best_table(&output.best));

    if !output.averages.is_empty() {
        println!("\nAverages per scheduler");
        println!("{}", table::averages_table(&output.averages));
    }
}
