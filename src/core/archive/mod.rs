// ─── Archive Extraction ───
// "Extract archive P into directory D" as a capability, with two backends:
// the host's own utility (default) and an in-process zip decoder.

pub mod builtin;
pub mod system;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::config::ExtractorKind;
use crate::core::error::{BuildError, BuildResult};
use crate::core::process::CommandRunner;

pub use builtin::BuiltinUnzip;
pub use system::SystemUnzip;

/// The available backends. Each exposes `unpack(archive, destination)`,
/// where `false` means the tool reported failure.
pub enum Extractor {
    System(SystemUnzip),
    Builtin(BuiltinUnzip),
}

impl Extractor {
    pub fn new(kind: ExtractorKind, runner: Arc<dyn CommandRunner>) -> Self {
        match kind {
            ExtractorKind::System => Self::System(SystemUnzip::new(runner)),
            ExtractorKind::Builtin => Self::Builtin(BuiltinUnzip),
        }
    }

    /// Extract `archive` into `destination` (the current directory when `None`)
    /// and return the destination.
    ///
    /// A missing archive fails with `ArchiveNotFound` before any backend runs.
    pub async fn decompress(
        &self,
        archive: &Path,
        destination: Option<&Path>,
    ) -> BuildResult<PathBuf> {
        if !tokio::fs::try_exists(archive).await.unwrap_or(false) {
            return Err(BuildError::ArchiveNotFound(archive.to_path_buf()));
        }

        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debug!("Decompressing {:?} into {:?}", archive, destination);

        let unpacked = match self {
            Extractor::System(backend) => backend.unpack(archive, &destination).await?,
            Extractor::Builtin(backend) => backend.unpack(archive, &destination).await?,
        };

        if !unpacked {
            return Err(BuildError::ExtractionFailed {
                archive: archive.to_path_buf(),
                destination,
            });
        }

        Ok(destination)
    }
}
