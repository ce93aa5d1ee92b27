use std::fmt::{Display, Formatter};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::str::FromStr;
use std::time::{Duration, Instant};

use power_bench_model::BenchmarkConfig;

/// How often a running simulator is polled when a timeout is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What to do with a run's artifact once the run is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Delete the artifact once its row has been harvested, and keep it when the run failed so
    /// that it can be inspected.
    #[default]
    RemoveOnSuccess,
    /// Delete the artifact whenever the run is over.
    Always,
    /// Never delete artifacts.
    Never,
}

impl CleanupPolicy {
    pub fn removes_on_success(self) -> bool {
        matches!(self, CleanupPolicy::RemoveOnSuccess | CleanupPolicy::Always)
    }

    pub fn removes_on_failure(self) -> bool {
        matches!(self, CleanupPolicy::Always)
    }
}

impl FromStr for CleanupPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remove-on-success" => Ok(CleanupPolicy::RemoveOnSuccess),
            "always" => Ok(CleanupPolicy::Always),
            "never" => Ok(CleanupPolicy::Never),
            _ => Err(anyhow::anyhow!(
                "Unknown cleanup policy '{s}', expected one of: remove-on-success, always, never"
            )),
        }
    }
}

impl Display for CleanupPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanupPolicy::RemoveOnSuccess => write!(f, "remove-on-success"),
            CleanupPolicy::Always => write!(f, "always"),
            CleanupPolicy::Never => write!(f, "never"),
        }
    }
}

/// Why a single run did not produce a result.
///
/// These never stop a sweep. They are logged and the sweep moves on to the next configuration.
#[derive(Debug, thiserror::Error)]
pub enum RunFailure {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("Failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },
    #[error("Failed to remove stale artifact {}: {source}", .artifact.display())]
    StaleArtifact {
        artifact: PathBuf,
        source: std::io::Error,
    },
    #[error("`{command}` did not finish within {timeout:?} and was killed")]
    TimedOut { command: String, timeout: Duration },
    #[error("`{command}` failed with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{command}` exited successfully but did not write {}", .artifact.display())]
    MissingArtifact { command: String, artifact: PathBuf },
    #[error("Could not collect a result from {}: {reason}", .artifact.display())]
    Collect { artifact: PathBuf, reason: String },
}

/// A completed simulator invocation with an artifact on disk.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Where the simulator wrote its results.
    pub artifact: PathBuf,
    /// Wall-clock time from spawning the simulator until it exited.
    pub elapsed: Duration,
}

/// Runs the simulator once per configuration.
#[derive(Debug, Clone)]
pub struct RunExecutor {
    simulator: PathBuf,
    work_dir: PathBuf,
    timeout: Option<Duration>,
    cleanup: CleanupPolicy,
    extra_args: Vec<String>,
}

impl RunExecutor {
    /// Create an executor for the simulator at the given path, writing artifacts to the current
    /// directory without a timeout.
    pub fn new(simulator: impl Into<PathBuf>) -> Self {
        Self {
            simulator: simulator.into(),
            work_dir: PathBuf::from("."),
            timeout: None,
            cleanup: CleanupPolicy::default(),
            extra_args: Vec::new(),
        }
    }

    /// Set the directory that per-run artifacts are written to.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Kill and fail runs that take longer than `timeout`. Without a timeout a hung simulator
    /// stalls the sweep.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Arguments appended to every simulator invocation, after the configuration arguments.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn cleanup(&self) -> CleanupPolicy {
        self.cleanup
    }

    /// The artifact path used for a configuration.
    pub fn artifact_path(&self, config: &BenchmarkConfig) -> PathBuf {
        self.work_dir.join(config.artifact_name())
    }

    /// Run the simulator for a configuration and block until it exits.
    ///
    /// Succeeds only if the simulator exits with status zero and the artifact exists afterwards.
    pub fn invoke(&self, config: &BenchmarkConfig) -> Result<Invocation, RunFailure> {
        let artifact = self.artifact_path(config);
        let mut command = self.command(config, &artifact);
        let command_line = describe(&command);

        log::info!("Running: {command_line}");

        if artifact.exists() {
            log::debug!("Removing stale artifact {}", artifact.display());
            std::fs::remove_file(&artifact).map_err(|source| RunFailure::StaleArtifact {
                artifact: artifact.clone(),
                source,
            })?;
        }

        let mut stderr_file = tempfile::tempfile().map_err(|source| RunFailure::Spawn {
            command: command_line.clone(),
            source,
        })?;
        let stderr = stderr_file
            .try_clone()
            .map_err(|source| RunFailure::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let start_time = Instant::now();
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr)
            .spawn()
            .map_err(|source| RunFailure::Spawn {
                command: command_line.clone(),
                source,
            })?;

        log::debug!("Running simulator with PID: {pid}", pid = child.id());
        let status = self.wait(child, &command_line)?;
        let elapsed = start_time.elapsed();
        log::debug!("Simulator process finished with status: {status} after {elapsed:?}");

        if !status.success() {
            return Err(RunFailure::ExitStatus {
                command: command_line,
                status,
                stderr: read_captured(&mut stderr_file),
            });
        }

        if !artifact.exists() {
            return Err(RunFailure::MissingArtifact {
                command: command_line,
                artifact,
            });
        }

        Ok(Invocation { artifact, elapsed })
    }

    /// Apply the cleanup policy to a run's artifact, if there is one.
    pub fn clean_up(&self, artifact: &Path, success: bool) {
        let remove = if success {
            self.cleanup.removes_on_success()
        } else {
            self.cleanup.removes_on_failure()
        };
        if !remove || !artifact.exists() {
            return;
        }

        match std::fs::remove_file(artifact) {
            Ok(()) => log::trace!("Removed artifact {}", artifact.display()),
            Err(e) => log::warn!("Failed to remove artifact {}: {e}", artifact.display()),
        }
    }

    fn command(&self, config: &BenchmarkConfig, artifact: &Path) -> Command {
        let mut command = Command::new(&self.simulator);
        command
            .arg("--scheduler")
            .arg(&config.scheduler)
            .arg("--tasks")
            .arg(config.task_count.to_string())
            .arg("--duration")
            .arg(config.duration.to_string())
            .arg("--seed")
            .arg(config.seed.to_string())
            .arg("--output")
            .arg(artifact)
            .args(&self.extra_args);

        // A timed out run is killed together with everything it started
        if self.timeout.is_some() {
            own_process_group(&mut command);
        }

        command
    }

    fn wait(&self, mut child: Child, command_line: &str) -> Result<ExitStatus, RunFailure> {
        let wait_failure = |source| RunFailure::Wait {
            command: command_line.to_string(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(wait_failure);
        };

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait().map_err(wait_failure)? {
                Some(status) => return Ok(status),
                None if Instant::now() >= deadline => break,
                None => std::thread::sleep(POLL_INTERVAL),
            }
        }

        log::warn!("Killing `{command_line}` after {timeout:?}");
        kill_process_group(&mut child);
        // Reap the process so it does not linger as a zombie
        let _ = child.wait();

        Err(RunFailure::TimedOut {
            command: command_line.to_string(),
            timeout,
        })
    }
}

#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt as _;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// Kill the simulator and every process in its process group.
#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_process_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg only sends a signal, the group was created for this child at spawn.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        let e = std::io::Error::last_os_error();
        log::error!("Failed to kill simulator process group {pgid}: {e}");
        if let Err(e) = child.kill() {
            log::error!("Failed to kill simulator process {}: {e}", child.id());
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::error!("Failed to kill simulator process {}: {e}", child.id());
    }
}

fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_captured(file: &mut std::fs::File) -> String {
    let mut captured = String::new();
    if let Err(e) = file
        .seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_string(&mut captured))
    {
        log::debug!("Could not read captured stderr: {e}");
    }
    captured.trim().to_string()
}
