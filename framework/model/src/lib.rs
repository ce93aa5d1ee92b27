mod config;
pub mod frame;
mod grid;
mod result;
mod store;
mod summary;
mod value;

pub use config::BenchmarkConfig;
pub use grid::ConfigGrid;
pub use result::{
    RunResult, BENCHMARK_TIME, DURATION_PARAM, SCHEDULER, SEED_PARAM, TASKS_PARAM,
};
pub use store::ResultStore;
pub use summary::SweepSummary;
pub use value::FieldValue;
