use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{BuildConfig, ExtractorKind};

/// Build Aseprite from source against a prebuilt Skia.
#[derive(Debug, Parser)]
#[command(name = "aseprite-build", version, about)]
pub struct Cli {
    /// JSON configuration file (defaults to <config dir>/aseprite-build/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for downloads, sources and logs (defaults to a new temp dir)
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// How to unpack downloaded archives
    #[arg(long, value_enum)]
    pub extractor: Option<ExtractorKind>,

    /// Do not draw download progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut BuildConfig) {
        if let Some(dir) = &self.work_dir {
            config.work_dir = Some(dir.clone());
        }
        if let Some(kind) = self.extractor {
            config.extractor = kind;
        }
    }
}
