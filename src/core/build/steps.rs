use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::config::BuildConfig;
use crate::core::error::{BuildError, BuildResult};
use crate::core::process::{CommandRunner, Invocation};

const TEMP_PREFIX: &str = "aseprite-build";

/// The configured working directory, or a fresh temporary one that outlives the run.
pub fn prepare_work_dir(config: &BuildConfig) -> BuildResult<PathBuf> {
    if let Some(dir) = &config.work_dir {
        std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
        return Ok(dir.clone());
    }

    let dir = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .map_err(|e| BuildError::io(std::env::temp_dir(), e))?
        .keep();
    info!("Working in {:?}", dir);
    Ok(dir)
}

/// Create `<source_dir>/<name>`. An existing directory is `BuildDirExists`.
pub async fn prepare_build_dir(source_dir: &Path, name: &str) -> BuildResult<PathBuf> {
    let build = source_dir.join(name);
    match tokio::fs::create_dir(&build).await {
        Ok(()) => Ok(build),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(BuildError::BuildDirExists(build))
        }
        Err(e) => Err(BuildError::io(build, e)),
    }
}

/// Persist captured stderr to a new log file in `dir` and return its path.
pub fn write_failure_log(dir: &Path, contents: &[u8]) -> BuildResult<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".log")
        .tempfile_in(dir)
        .map_err(|e| BuildError::io(dir, e))?;
    file.write_all(contents)
        .map_err(|e| BuildError::io(file.path(), e))?;

    let (_, path) = file.keep().map_err(|e| BuildError::io(dir, e.error))?;
    Ok(path)
}

/// Run an external step. On a non-zero exit the stderr goes to a log file
/// in `log_dir` and the step fails with `StepFailed`.
pub async fn run_step(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
    step: &'static str,
    log_dir: &Path,
) -> BuildResult<()> {
    debug!("Step '{}': {}", step, invocation);
    let outcome = runner.run(invocation).await?;
    if outcome.success {
        return Ok(());
    }

    let log = write_failure_log(log_dir, &outcome.stderr)?;
    Err(BuildError::StepFailed { step, log })
}
