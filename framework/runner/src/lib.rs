mod collect;
mod executor;
mod grid;
mod progress;
mod simulator;
mod sweep;

pub mod prelude {
    pub use crate::collect::collect;
    pub use crate::executor::{CleanupPolicy, Invocation, RunExecutor, RunFailure};
    pub use crate::grid::{GridFile, SweepMode, DEFAULT_SEED, SCHEDULERS};
    pub use crate::simulator::{simulator_path, DEFAULT_SIMULATOR_PATH, POWER_BENCH_SIMULATOR_ENV};
    pub use crate::sweep::{Sweep, SweepOutcome};
}
