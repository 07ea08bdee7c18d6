use std::path::{Path, PathBuf};

use crate::core::config::BuildConfig;
use crate::core::platform::Platform;

/// A prebuilt archive the build needs, and where it unpacks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub url: String,
    /// Logical name; also the directory the archive extracts into.
    pub name: String,
    pub directory: PathBuf,
    pub sha256: Option<String>,
}

impl ArtifactDescriptor {
    /// Prebuilt Skia for `platform`.
    pub fn skia(config: &BuildConfig, platform: &Platform, directory: &Path) -> Self {
        Self {
            url: platform.skia_url(config),
            name: config.skia_name(),
            directory: directory.to_path_buf(),
            sha256: config.skia_sha256.clone(),
        }
    }

    /// Aseprite source release.
    pub fn aseprite(config: &BuildConfig, directory: &Path) -> Self {
        let version = &config.aseprite_version;
        Self {
            url: format!(
                "{}/releases/download/{}/Aseprite-{}-Source.zip",
                config.aseprite_repository.trim_end_matches('/'),
                version,
                version
            ),
            name: config.aseprite_name(),
            directory: directory.to_path_buf(),
            sha256: config.aseprite_sha256.clone(),
        }
    }

    /// `<directory>/<name>`
    pub fn output_dir(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// `<directory>/<name>.zip`
    pub fn archive_path(&self) -> PathBuf {
        self.directory.join(format!("{}.zip", self.name))
    }
}
