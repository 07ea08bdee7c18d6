use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the build bootstrapper.
/// Every module returns `Result<T, BuildError>`.
#[derive(Debug, Error)]
pub enum BuildError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Environment ─────────────────────────────────────
    #[error("detected unsupported platform {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error(
        "one or more expected {group} dependencies were not found: {}",
        .missing.join(", ")
    )]
    MissingDependencies { group: String, missing: Vec<String> },

    #[error("invalid version range {range:?}: {source}")]
    InvalidVersionRange {
        range: String,
        source: semver::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("SHA-256 mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("archive not found: {0:?}")]
    ArchiveNotFound(PathBuf),

    #[error("failed to decompress {archive:?} into {destination:?}")]
    ExtractionFailed {
        archive: PathBuf,
        destination: PathBuf,
    },

    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── External processes ──────────────────────────────
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to {step}; a log has been written to {}", .log.display())]
    StepFailed { step: &'static str, log: PathBuf },

    #[error("build directory {0:?} already exists; remove it before building again")]
    BuildDirExists(PathBuf),

    // ── Configuration ───────────────────────────────────
    #[error("configuration error: {0}")]
    Config(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type BuildResult<T> = Result<T, BuildError>;

impl From<std::io::Error> for BuildError {
    fn from(source: std::io::Error) -> Self {
        BuildError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BuildError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
