use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::deps::parse_range;
use crate::core::error::{BuildError, BuildResult};

const CONFIG_DIR_NAME: &str = "aseprite-build";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_MACOS_SDK: &str =
    "/Applications/Xcode.app/Contents/Developer/Platforms/MacOSX.platform/Developer/SDKs/MacOSX.sdk";

/// How downloaded archives are unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// External utility (`unzip`, or PowerShell on Windows).
    System,
    /// In-process zip decoder.
    Builtin,
}

/// Every tunable of a build run. Missing JSON fields fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub cmake_version: String,
    pub ninja_version: String,
    pub version_flag: String,

    pub skia_version: String,
    pub skia_repository: String,
    pub skia_sha256: Option<String>,

    pub aseprite_version: String,
    pub aseprite_repository: String,
    pub aseprite_sha256: Option<String>,

    pub macos_sdk: PathBuf,
    pub build_type: String,
    pub deployment_target: String,
    pub build_dir: String,

    /// Working directory for archives, sources and logs. `None` means a
    /// fresh temporary directory per run.
    pub work_dir: Option<PathBuf>,
    pub extractor: ExtractorKind,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cmake_version: ">=3.16".to_string(),
            ninja_version: "*".to_string(),
            version_flag: "--version".to_string(),
            skia_version: "m102-861e4743af".to_string(),
            skia_repository: "https://github.com/aseprite/skia".to_string(),
            skia_sha256: None,
            aseprite_version: "v1.3.8.1".to_string(),
            aseprite_repository: "https://github.com/aseprite/aseprite".to_string(),
            aseprite_sha256: None,
            macos_sdk: PathBuf::from(DEFAULT_MACOS_SDK),
            build_type: "RelWithDebInfo".to_string(),
            deployment_target: "11.0".to_string(),
            build_dir: "build".to_string(),
            work_dir: None,
            extractor: ExtractorKind::System,
        }
    }
}

impl BuildConfig {
    /// Directory name of the extracted Skia archive.
    pub fn skia_name(&self) -> String {
        format!("skia-{}", self.skia_version)
    }

    /// Directory name of the extracted Aseprite sources.
    pub fn aseprite_name(&self) -> String {
        format!("aseprite-{}", self.aseprite_version)
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist and parse. Without one, the per-user
    /// config file is used when present, otherwise the defaults. The tool
    /// version ranges are validated before anything runs.
    pub fn load(explicit: Option<&Path>) -> BuildResult<Self> {
        let config = match (explicit, default_config_path()) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) if path.is_file() => Self::from_file(&path)?,
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Fail on a version range no tool could ever satisfy.
    pub fn validate(&self) -> BuildResult<()> {
        parse_range(&self.cmake_version)?;
        parse_range(&self.ninja_version)?;
        Ok(())
    }

    pub fn from_file(path: &Path) -> BuildResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BuildError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: BuildConfig = serde_json::from_str(&raw).map_err(|e| {
            BuildError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        info!("Loaded build configuration from {:?}", path);
        Ok(config)
    }
}

/// `<config dir>/aseprite-build/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_release_pins() {
        let config = BuildConfig::default();
        assert_eq!(config.skia_name(), "skia-m102-861e4743af");
        assert_eq!(config.aseprite_name(), "aseprite-v1.3.8.1");
        assert_eq!(config.cmake_version, ">=3.16");
        assert_eq!(config.ninja_version, "*");
        assert_eq!(config.extractor, ExtractorKind::System);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "aseprite_version": "v1.3.9", "extractor": "builtin" }"#,
        )
        .unwrap();

        let config = BuildConfig::load(Some(&path)).unwrap();
        assert_eq!(config.aseprite_version, "v1.3.9");
        assert_eq!(config.extractor, ExtractorKind::Builtin);
        assert_eq!(config.skia_version, "m102-861e4743af");
        assert_eq!(config.build_dir, "build");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuildConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            BuildConfig::from_file(&path),
            Err(BuildError::Config(_))
        ));
    }

    #[test]
    fn ranges_are_validated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "cmake_version": ">=3.16 <4" }"#).unwrap();
        assert_eq!(BuildConfig::load(Some(&path)).unwrap().cmake_version, ">=3.16 <4");

        std::fs::write(&path, r#"{ "ninja_version": "latest" }"#).unwrap();
        let err = BuildConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidVersionRange { ref range, .. } if range == "latest"
        ));
    }
}
