use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use power_bench_model::BenchmarkConfig;

/// Shows how far through a sweep we are, and the outcome of each run.
///
/// With the progress bar disabled, the same information is printed as plain lines, which is
/// better suited to CI logs.
pub struct SweepProgress {
    total: usize,
    current: usize,
    bar: Option<ProgressBar>,
}

impl SweepProgress {
    pub fn new(total: usize, show_bar: bool) -> Self {
        let bar = show_bar.then(|| {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise}] {msg}",
                )
                .expect("Failed to set progress style")
                .progress_chars("#>-"),
            );
            pb.enable_steady_tick(Duration::from_millis(200));
            pb
        });

        Self {
            total,
            current: 0,
            bar,
        }
    }

    /// Announce the start of a run.
    pub fn start_run(&mut self, config: &BenchmarkConfig) {
        self.current += 1;
        match &self.bar {
            Some(pb) => pb.set_message(config.to_string()),
            None => println!("[{}/{}] {config}", self.current, self.total),
        }
    }

    /// Record the outcome of the current run.
    pub fn finish_run(&self, config: &BenchmarkConfig, success: bool, elapsed: Duration) {
        let line = if success {
            format!(
                "[{}/{}] ✓ {config} completed in {:.2}s",
                self.current,
                self.total,
                elapsed.as_secs_f64()
            )
        } else {
            format!("[{}/{}] ✗ {config} failed", self.current, self.total)
        };

        match &self.bar {
            Some(pb) => {
                pb.println(line);
                pb.inc(1);
            }
            None => println!("{line}"),
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }
}
