// ─── Platform ───
// Closed set of supported (OS, architecture) pairs. Detected once at startup
// and threaded through the pipeline; everything platform-specific hangs off it.

mod macos;

use std::fmt;
use std::path::Path;

use crate::core::config::BuildConfig;
use crate::core::deps::DependencyGroup;
use crate::core::error::{BuildError, BuildResult};

/// Raw host identification, as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOs,
}

impl Os {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "macos" | "darwin" => Some(Os::MacOs),
            _ => None,
        }
    }

    /// Public-facing name used in Skia release asset names.
    pub fn release_name(self) -> &'static str {
        match self {
            Os::MacOs => "macos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    X64,
}

impl Arch {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "aarch64" | "arm64" => Some(Arch::Arm64),
            "x86_64" | "x64" => Some(Arch::X64),
            _ => None,
        }
    }

    /// Name used by the Skia release assets and their `out/Release-<arch>` folder.
    pub fn release_name(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X64 => "x64",
        }
    }

    /// Standard architecture name, as toolchains expect it.
    pub fn standardized(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X64 => "x86_64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Map a host onto a supported platform, or fail with `UnsupportedPlatform`.
    pub fn detect(host: &HostInfo) -> BuildResult<Self> {
        let unsupported = || BuildError::UnsupportedPlatform {
            os: host.os.clone(),
            arch: host.arch.clone(),
        };

        let os = Os::parse(&host.os).ok_or_else(unsupported)?;
        let arch = Arch::parse(&host.arch).ok_or_else(unsupported)?;
        Ok(Self { os, arch })
    }

    /// Prerequisites specific to this platform, checked after the common ones.
    pub fn requirements(&self, config: &BuildConfig) -> DependencyGroup {
        match self.os {
            Os::MacOs => macos::requirements(config),
        }
    }

    /// Arguments for the configuration generator, run from the build directory.
    pub fn configure_args(&self, config: &BuildConfig, skia_dir: &Path) -> Vec<String> {
        match self.os {
            Os::MacOs => macos::configure_args(self.arch, config, skia_dir),
        }
    }

    /// Download URL of the prebuilt Skia archive for this platform.
    pub fn skia_url(&self, config: &BuildConfig) -> String {
        format!(
            "{}/releases/download/{}/skia-{}-release-{}.zip",
            config.skia_repository.trim_end_matches('/'),
            config.skia_version,
            self.os.release_name(),
            self.arch.release_name()
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.release_name(), self.arch.release_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_pairs_detect() {
        for (os, arch, expected) in [
            ("macos", "aarch64", Arch::Arm64),
            ("macos", "x86_64", Arch::X64),
            ("darwin", "arm64", Arch::Arm64),
            ("darwin", "x64", Arch::X64),
        ] {
            let platform = Platform::detect(&HostInfo::new(os, arch)).unwrap();
            assert_eq!(platform.os, Os::MacOs);
            assert_eq!(platform.arch, expected);
        }
    }

    #[test]
    fn unsupported_pairs_fail() {
        for (os, arch) in [
            ("linux", "x86_64"),
            ("windows", "x86_64"),
            ("freebsd", "aarch64"),
            ("macos", "powerpc"),
            ("macos", "x86"),
        ] {
            let err = Platform::detect(&HostInfo::new(os, arch)).unwrap_err();
            assert!(
                matches!(err, BuildError::UnsupportedPlatform { .. }),
                "{os}-{arch} should be unsupported"
            );
        }
    }

    #[test]
    fn architecture_names() {
        assert_eq!(Arch::X64.release_name(), "x64");
        assert_eq!(Arch::X64.standardized(), "x86_64");
        assert_eq!(Arch::Arm64.standardized(), "arm64");
    }

    #[test]
    fn skia_url_uses_public_os_name_and_release_arch() {
        let config = BuildConfig::default();
        let platform = Platform::detect(&HostInfo::new("darwin", "x64")).unwrap();
        assert_eq!(
            platform.skia_url(&config),
            "https://github.com/aseprite/skia/releases/download/m102-861e4743af/skia-macos-release-x64.zip"
        );
    }

    #[test]
    fn display_uses_release_names() {
        let platform = Platform::detect(&HostInfo::new("darwin", "x64")).unwrap();
        assert_eq!(platform.to_string(), "macos-x64");
    }
}
