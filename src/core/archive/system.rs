use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::error::BuildResult;
use crate::core::process::{CommandRunner, Invocation};

/// Delegates to the host's archive utility: PowerShell `Expand-Archive` on
/// Windows, `unzip` everywhere else.
pub struct SystemUnzip {
    runner: Arc<dyn CommandRunner>,
    host_os: String,
}

impl SystemUnzip {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::for_os(runner, std::env::consts::OS)
    }

    pub fn for_os(runner: Arc<dyn CommandRunner>, host_os: &str) -> Self {
        Self {
            runner,
            host_os: host_os.to_string(),
        }
    }

    pub fn invocation(&self, archive: &Path, destination: &Path) -> Invocation {
        if self.host_os == "windows" {
            // PowerShell re-parses its arguments, so paths are quoted.
            Invocation::new("PowerShell").args([
                "Expand-Archive".to_string(),
                "-Path".to_string(),
                format!("\"{}\"", archive.display()),
                "-DestinationPath".to_string(),
                format!("\"{}\"", destination.display()),
            ])
        } else {
            Invocation::new("unzip").args([
                archive.display().to_string(),
                "-d".to_string(),
                destination.display().to_string(),
            ])
        }
    }

    pub async fn unpack(&self, archive: &Path, destination: &Path) -> BuildResult<bool> {
        let invocation = self.invocation(archive, destination);
        debug!("Extracting with: {}", invocation);

        let outcome = self.runner.run(&invocation).await?;
        if !outcome.success {
            warn!(
                "{} failed: {}",
                invocation.program,
                outcome.stderr_text().trim()
            );
        }
        Ok(outcome.success)
    }
}
