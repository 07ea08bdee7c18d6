// ─── Build Pipeline ───
// DetectPlatform → VerifyCommonDeps → VerifyPlatformDeps → AcquireArtifacts
//   → PrepareBuildDir → Configure → Build → Done
// Forward-only: any error ends the run and is returned to the driver.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::core::archive::Extractor;
use crate::core::config::BuildConfig;
use crate::core::deps::{DependencyGroup, DependencyVerifier};
use crate::core::downloader::{ArtifactDescriptor, Downloader};
use crate::core::error::BuildResult;
use crate::core::http::build_http_client;
use crate::core::platform::{HostInfo, Platform};
use crate::core::process::{CommandRunner, Invocation};
use crate::core::report::Reporter;

use super::steps::{prepare_build_dir, prepare_work_dir, run_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DetectPlatform,
    VerifyCommonDeps,
    VerifyPlatformDeps,
    AcquireArtifacts,
    PrepareBuildDir,
    Configure,
    Build,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DetectPlatform => "detect-platform",
            Stage::VerifyCommonDeps => "verify-common-deps",
            Stage::VerifyPlatformDeps => "verify-platform-deps",
            Stage::AcquireArtifacts => "acquire-artifacts",
            Stage::PrepareBuildDir => "prepare-build-dir",
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    runner: Arc<dyn CommandRunner>,
    downloader: Downloader,
    reporter: &'a dyn Reporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a BuildConfig,
        runner: Arc<dyn CommandRunner>,
        downloader: Downloader,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            runner,
            downloader,
            reporter,
        }
    }

    /// Wire up the HTTP client and extractor the configuration asks for.
    pub fn from_config(
        config: &'a BuildConfig,
        runner: Arc<dyn CommandRunner>,
        reporter: &'a dyn Reporter,
        show_progress: bool,
    ) -> BuildResult<Self> {
        let extractor = Extractor::new(config.extractor, runner.clone());
        let downloader =
            Downloader::new(build_http_client()?, extractor).with_progress(show_progress);
        Ok(Self::new(config, runner, downloader, reporter))
    }

    /// Run every stage in order and return the build output directory.
    pub async fn run(&self, host: &HostInfo) -> BuildResult<PathBuf> {
        let config = self.config;
        let reporter = self.reporter;

        self.enter(Stage::DetectPlatform);
        let platform = Platform::detect(host)?;
        reporter.info(&format!("detected supported platform {platform}"));

        let verifier = DependencyVerifier::new(self.runner.as_ref(), reporter);

        self.enter(Stage::VerifyCommonDeps);
        verifier.verify(&DependencyGroup::common(config)).await?;

        self.enter(Stage::VerifyPlatformDeps);
        verifier.verify(&platform.requirements(config)).await?;

        self.enter(Stage::AcquireArtifacts);
        let output = prepare_work_dir(config)?;
        let skia = ArtifactDescriptor::skia(config, &platform, &output);
        let skia_dir = self.downloader.download_zip(&skia, reporter).await?;
        let source = ArtifactDescriptor::aseprite(config, &output);
        let source_dir = self.downloader.download_zip(&source, reporter).await?;

        self.enter(Stage::PrepareBuildDir);
        reporter.info("attempting to set the build up");
        let build = prepare_build_dir(&source_dir, &config.build_dir).await?;

        self.enter(Stage::Configure);
        let configure = Invocation::new("cmake")
            .args(platform.configure_args(config, &skia_dir))
            .current_dir(&build);
        run_step(self.runner.as_ref(), &configure, "set the build up", &output).await?;
        reporter.success("successfully set the build up");

        self.enter(Stage::Build);
        reporter.info("attempting to build");
        let ninja = Invocation::new("ninja").current_dir(&build);
        run_step(self.runner.as_ref(), &ninja, "build", &output).await?;

        self.enter(Stage::Done);
        reporter.success(&format!("successfully built aseprite to {}!", build.display()));
        Ok(build)
    }

    fn enter(&self, stage: Stage) {
        debug!("Entering stage {}", stage);
    }
}
