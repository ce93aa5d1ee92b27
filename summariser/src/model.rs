use power_bench_model::SweepSummary;
use serde::{Deserialize, Serialize};

/// Whether a smaller or a larger value of a metric is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Whether `candidate` strictly beats `current`.
    pub(crate) fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Direction::Minimize => candidate < current,
            Direction::Maximize => candidate > current,
        }
    }
}

/// A metric to pick a best run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub label: String,
    pub column: String,
    pub direction: Direction,
}

impl MetricSpec {
    pub fn new(label: &str, column: &str, direction: Direction) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
            direction,
        }
    }
}

/// A metric on the normalized multi-metric comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarMetric {
    pub column: String,
    pub label: String,
    /// When set, the lowest raw value normalizes to `1.0`, otherwise the highest does.
    pub lower_is_better: bool,
}

impl RadarMetric {
    pub fn new(column: &str, label: &str, lower_is_better: bool) -> Self {
        Self {
            column: column.to_string(),
            label: label.to_string(),
            lower_is_better,
        }
    }
}

/// The run that scored best on one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub metric_label: String,
    pub winning_config_scheduler: String,
    pub winning_value: f64,
    pub winning_task_count: Option<i64>,
    pub winning_duration: Option<i64>,
}

/// Mean values of the runs of one scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAverage {
    pub scheduler: String,
    /// `(column, mean)` in the order the columns were requested. Columns without any numeric
    /// value in the group are left out.
    pub means: Vec<(String, f64)>,
}

impl GroupAverage {
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, mean)| *mean)
    }
}

/// One row of the comparison set, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    /// Raw values aligned with the radar metrics.
    pub raw: Vec<f64>,
}

/// The normalized values of one comparison row, closed for polygon rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub label: String,
    /// One value per metric followed by the first value again.
    pub values: Vec<f64>,
}

/// Everything needed to draw the multi-metric comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub metrics: Vec<RadarMetric>,
    /// One angle per metric, evenly spaced over a full turn, followed by the first angle again.
    pub angles: Vec<f64>,
    pub profiles: Vec<NormalizedProfile>,
}

/// Statistics for one task type of a task-level artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTypeStats {
    pub task_type: String,
    pub count: usize,
    pub mean_duration: f64,
    /// Mean turnaround over tasks with a positive turnaround time.
    pub mean_turnaround: Option<f64>,
}

/// The report written at the end of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub sweep: Option<SweepSummary>,
    pub fingerprint: Option<String>,
    pub best: Vec<SummaryRecord>,
    pub averages: Vec<GroupAverage>,
    pub radar: Option<RadarChart>,
}

impl SummaryOutput {
    /// Attach the sweep this output was computed for.
    pub fn with_sweep(mut self, sweep: SweepSummary) -> Self {
        self.fingerprint = Some(sweep.fingerprint());
        self.sweep = Some(sweep);
        self
    }
}
