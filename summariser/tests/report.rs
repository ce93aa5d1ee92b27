use power_bench_model::{
    BenchmarkConfig, ConfigGrid, FieldValue, ResultStore, RunResult, SweepSummary,
};
use power_bench_summariser::model::SummaryOutput;
use power_bench_summariser::{task_stats, write_report, SummaryEngine};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn run(scheduler: &str, task_count: u32, energy: f64, ticks: i64) -> RunResult {
    let config = BenchmarkConfig::new(scheduler, task_count, 10000, 42);
    let row = vec![
        ("scheduler".to_string(), FieldValue::from(scheduler)),
        ("total_tasks".to_string(), FieldValue::Int(task_count as i64)),
        ("completed_tasks".to_string(), FieldValue::Int(task_count as i64)),
        ("execution_time_ticks".to_string(), FieldValue::Int(ticks)),
        ("total_energy_J".to_string(), FieldValue::Float(energy)),
        ("average_power_W".to_string(), FieldValue::Float(energy / 10.0)),
        ("peak_temp_C".to_string(), FieldValue::Float(45.0)),
    ];
    RunResult::from_simulator_row(&config, row, Duration::from_millis(250))
}

fn results() -> ResultStore {
    [
        run("RR", 25, 10.0, 300),
        run("RR", 50, 20.0, 500),
        run("DVFS", 25, 6.0, 400),
        run("DVFS", 50, 14.0, 700),
    ]
    .into_iter()
    .collect()
}

#[test]
fn persisted_table_summarises_like_the_sweep() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("benchmark_results.csv");

    let results = results();
    results.write_csv(&path)?;

    let engine = SummaryEngine::default();
    let from_sweep = engine.summarise(&results)?;
    let from_file = engine.summarise_csv(&path)?;

    assert_eq!(from_sweep, from_file);

    let energy = &from_file.best[0];
    assert_eq!(energy.metric_label, "Energy Efficiency");
    assert_eq!(energy.winning_config_scheduler, "DVFS");
    assert_eq!(energy.winning_value, 6.0);
    assert_eq!(energy.winning_task_count, Some(25));
    assert_eq!(energy.winning_duration, Some(10000));

    let rr = &from_file.averages[1];
    assert_eq!(rr.scheduler, "RR");
    assert_eq!(rr.mean("total_energy_J"), Some(15.0));
    assert_eq!(rr.mean("execution_time_ticks"), Some(400.0));
    assert_eq!(rr.mean("benchmark_time"), Some(0.25));

    Ok(())
}

#[test]
fn report_round_trips_through_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");

    let mut sweep = SweepSummary::new(
        "run-1".to_string(),
        "comparison".to_string(),
        1_700_000_000,
        ConfigGrid {
            schedulers: vec!["DVFS".to_string(), "RR".to_string()],
            task_counts: vec![25, 50],
            durations: vec![10000],
            seeds: vec![42],
        },
    );
    for _ in 0..4 {
        sweep.record_run(true);
    }

    let output = SummaryEngine::default()
        .summarise(&results())?
        .with_sweep(sweep.clone());
    write_report(&output, &path)?;

    let read: SummaryOutput = serde_json::from_reader(std::fs::File::open(&path)?)?;
    assert_eq!(read.sweep, Some(sweep.clone()));
    assert_eq!(read.fingerprint, Some(sweep.fingerprint()));
    assert_eq!(read.averages.len(), 2);

    let radar = read.radar.expect("radar chart in report");
    assert_eq!(radar.profiles.len(), 2);
    assert!(radar
        .profiles
        .iter()
        .all(|profile| profile.values.len() == radar.angles.len()));

    Ok(())
}

#[test]
fn task_level_artifact() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tasks.csv");
    std::fs::write(
        &path,
        "id,type,duration,turnaround_time\n1,cpu,10,12\n2,io,4,0\n3,cpu,20,30\n",
    )?;

    let frame = power_bench_model::frame::read_csv(&path)?;
    let stats = task_stats(&frame)?;

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].task_type, "cpu");
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[0].mean_duration, 15.0);
    assert_eq!(stats[0].mean_turnaround, Some(21.0));
    assert_eq!(stats[1].mean_turnaround, None);

    Ok(())
}
