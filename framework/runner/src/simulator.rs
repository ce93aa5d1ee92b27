use std::path::{Path, PathBuf};

use anyhow::bail;
use anyhow::Context;

/// Environment variable to override the path to the simulator binary.
pub const POWER_BENCH_SIMULATOR_ENV: &str = "POWER_BENCH_SIMULATOR";

/// Default path to the simulator binary, relative to the working directory.
pub const DEFAULT_SIMULATOR_PATH: &str = "./powerprofile";

/// Resolve the path to the simulator binary.
///
/// A path with more than one component must exist as given. A bare name, such as `powerprofile`,
/// is looked up in the user's `PATH`.
pub fn simulator_path(configured: &Path) -> anyhow::Result<PathBuf> {
    if configured.as_os_str().is_empty() {
        bail!("Path to the simulator binary is empty");
    }

    if configured.components().count() == 1 && !configured.is_absolute() {
        log::debug!(
            "'{}' is not a path so looking in user's 'PATH'",
            configured.display()
        );
        return which::which(configured).with_context(|| {
            format!(
                "Simulator binary '{}' not found in PATH. Please build the simulator or set '{POWER_BENCH_SIMULATOR_ENV}' to the correct path.",
                configured.display()
            )
        });
    }

    if !configured.exists() {
        bail!(
            "Simulator binary '{}' not found. Please build the simulator first",
            configured.display()
        );
    }

    Ok(configured.to_path_buf())
}
