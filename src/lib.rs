mod cli;
pub mod core;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::build::Pipeline;
use crate::core::config::BuildConfig;
use crate::core::error::BuildResult;
use crate::core::platform::HostInfo;
use crate::core::process::SystemRunner;
use crate::core::report::{ConsoleReporter, Reporter};

/// Entry point: parse the command line, run the pipeline, map the outcome to
/// an exit status. The only place that decides how the process ends.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let reporter = ConsoleReporter::new();
    match execute(&cli, &reporter).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            reporter.error(&error.to_string());
            ExitCode::from(1)
        }
    }
}

async fn execute(cli: &Cli, reporter: &dyn Reporter) -> BuildResult<std::path::PathBuf> {
    let mut config = BuildConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let show_progress = !cli.no_progress && Term::stderr().is_term();
    let pipeline = Pipeline::from_config(&config, Arc::new(SystemRunner), reporter, show_progress)?;

    tracing::info!("aseprite-build starting");
    pipeline.run(&HostInfo::current()).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,aseprite_build_lib=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
