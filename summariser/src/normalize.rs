use std::f64::consts::TAU;

use crate::model::{ComparisonRow, GroupAverage, NormalizedProfile, RadarChart, RadarMetric};

/// Build the comparison set from per-scheduler means, one row per scheduler.
///
/// Metrics that are not averaged for every scheduler are dropped, the returned metric list is the
/// one the rows are aligned with.
pub(crate) fn comparison_rows(
    metrics: &[RadarMetric],
    averages: &[GroupAverage],
) -> (Vec<RadarMetric>, Vec<ComparisonRow>) {
    let kept = metrics
        .iter()
        .filter(|metric| {
            let present = averages
                .iter()
                .all(|group| group.mean(&metric.column).is_some());
            if !present {
                log::debug!("Dropping radar metric {}, no values", metric.column);
            }
            present
        })
        .cloned()
        .collect::<Vec<_>>();

    let rows = averages
        .iter()
        .map(|group| ComparisonRow {
            label: group.scheduler.clone(),
            raw: kept
                .iter()
                .filter_map(|metric| group.mean(&metric.column))
                .collect(),
        })
        .collect();

    (kept, rows)
}

/// Min-max normalize each metric across the comparison rows onto `[0, 1]`.
///
/// For a lower-is-better metric the lowest raw value maps to `1.0` and the highest to `0.0`; a
/// higher-is-better metric maps the other way round. When every row has the same raw value the
/// metric normalizes to `1.0` for all rows.
///
/// Values and angles are closed: the first entry is repeated at the end so the series can be drawn
/// as a polygon.
pub fn normalize(metrics: &[RadarMetric], rows: &[ComparisonRow]) -> RadarChart {
    let bounds = (0..metrics.len())
        .map(|metric_idx| {
            rows.iter()
                .filter_map(|row| row.raw.get(metric_idx).copied())
                .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                    None => Some((v, v)),
                    Some((min, max)) => Some((min.min(v), max.max(v))),
                })
        })
        .collect::<Vec<_>>();

    let profiles = rows
        .iter()
        .map(|row| {
            let values = metrics
                .iter()
                .zip(&bounds)
                .zip(&row.raw)
                .map(|((metric, bounds), &raw)| match bounds {
                    Some((min, max)) if max != min => {
                        let scaled = (raw - min) / (max - min);
                        if metric.lower_is_better {
                            1.0 - scaled
                        } else {
                            scaled
                        }
                    }
                    _ => 1.0,
                })
                .collect::<Vec<_>>();

            NormalizedProfile {
                label: row.label.clone(),
                values: close(values),
            }
        })
        .collect();

    RadarChart {
        metrics: metrics.to_vec(),
        angles: angles(metrics.len()),
        profiles,
    }
}

/// Evenly spaced angles over a full turn, one per metric, closed.
fn angles(count: usize) -> Vec<f64> {
    let angles = (0..count)
        .map(|i| TAU * i as f64 / count as f64)
        .collect::<Vec<_>>();
    close(angles)
}

fn close(mut values: Vec<f64>) -> Vec<f64> {
    if let Some(&first) = values.first() {
        values.push(first);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn row(label: &str, raw: &[f64]) -> ComparisonRow {
        ComparisonRow {
            label: label.to_string(),
            raw: raw.to_vec(),
        }
    }

    #[test]
    fn identical_values_normalize_to_one() {
        let metrics = [RadarMetric::new("peak_temp_C", "Peak Temp", true)];
        let chart = normalize(
            &metrics,
            &[row("RR", &[7.0]), row("FCFS", &[7.0]), row("DVFS", &[7.0])],
        );

        for profile in &chart.profiles {
            assert_eq!(profile.values, vec![1.0, 1.0]);
        }
    }

    #[test]
    fn lower_is_better_inverts() {
        let metrics = [RadarMetric::new("total_energy_J", "Energy", true)];
        let chart = normalize(&metrics, &[row("RR", &[10.0]), row("FCFS", &[20.0])]);

        assert_eq!(chart.profiles[0].values, vec![1.0, 1.0]);
        assert_eq!(chart.profiles[1].values, vec![0.0, 0.0]);
    }

    #[test]
    fn higher_is_better_does_not_invert() {
        let metrics = [RadarMetric::new("completed_tasks", "Completed", false)];
        let chart = normalize(
            &metrics,
            &[row("RR", &[10.0]), row("FCFS", &[20.0]), row("DVFS", &[15.0])],
        );

        assert_eq!(chart.profiles[0].values, vec![0.0, 0.0]);
        assert_eq!(chart.profiles[1].values, vec![1.0, 1.0]);
        assert_eq!(chart.profiles[2].values, vec![0.5, 0.5]);
    }

    #[test]
    fn profiles_and_angles_are_closed() {
        let metrics = [
            RadarMetric::new("total_energy_J", "Energy", true),
            RadarMetric::new("execution_time_ticks", "Exec Time", true),
            RadarMetric::new("peak_temp_C", "Peak Temp", true),
            RadarMetric::new("average_power_W", "Avg Power", true),
        ];
        let chart = normalize(
            &metrics,
            &[
                row("RR", &[10.0, 100.0, 50.0, 2.0]),
                row("DVFS", &[20.0, 300.0, 50.0, 1.0]),
                row("FCFS", &[15.0, 200.0, 50.0, 4.0]),
            ],
        );

        assert_eq!(chart.angles, vec![0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, 0.0]);
        assert_eq!(chart.profiles[0].values, vec![1.0, 1.0, 1.0, 1.0 - 1.0 / 3.0, 1.0]);
        assert_eq!(chart.profiles[1].values, vec![0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(chart.profiles[2].values, vec![0.5, 0.5, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn comparison_rows_drop_metrics_without_values() {
        let metrics = [
            RadarMetric::new("total_energy_J", "Energy", true),
            RadarMetric::new("average_power_W", "Avg Power", true),
        ];
        let averages = [
            GroupAverage {
                scheduler: "FCFS".to_string(),
                means: vec![("total_energy_J".to_string(), 12.5)],
            },
            GroupAverage {
                scheduler: "RR".to_string(),
                means: vec![
                    ("total_energy_J".to_string(), 10.0),
                    ("average_power_W".to_string(), 2.0),
                ],
            },
        ];

        let (kept, rows) = comparison_rows(&metrics, &averages);

        assert_eq!(kept, vec![metrics[0].clone()]);
        assert_eq!(
            rows,
            vec![
                ComparisonRow {
                    label: "FCFS".to_string(),
                    raw: vec![12.5],
                },
                ComparisonRow {
                    label: "RR".to_string(),
                    raw: vec![10.0],
                },
            ]
        );
    }

    #[test]
    fn no_metrics_gives_empty_series() {
        let chart = normalize(&[], &[row("RR", &[])]);
        assert!(chart.angles.is_empty());
        assert!(chart.profiles[0].values.is_empty());
    }
}
