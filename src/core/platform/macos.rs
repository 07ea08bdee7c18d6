use std::path::Path;

use crate::core::config::BuildConfig;
use crate::core::deps::{DependencyGroup, Requirement};

use super::Arch;

pub fn requirements(config: &BuildConfig) -> DependencyGroup {
    DependencyGroup::new(
        "macos",
        vec![Requirement::path("macos sdk", &config.macos_sdk)],
    )
}

/// CMake arguments for an Xcode SDK build against the prebuilt Skia in `skia_dir`.
pub fn configure_args(arch: Arch, config: &BuildConfig, skia_dir: &Path) -> Vec<String> {
    let library_dir = skia_dir
        .join("out")
        .join(format!("Release-{}", arch.release_name()));

    let mut args = vec![
        format!("-DCMAKE_BUILD_TYPE={}", config.build_type),
        format!("-DCMAKE_OSX_ARCHITECTURES={}", arch.standardized()),
        format!("-DCMAKE_OSX_DEPLOYMENT_TARGET={}", config.deployment_target),
        format!("-DCMAKE_OSX_SYSROOT={}", config.macos_sdk.display()),
        "-DLAF_BACKEND=skia".to_string(),
        format!("-DSKIA_DIR={}", skia_dir.display()),
        format!("-DSKIA_LIBRARY_DIR={}", library_dir.display()),
        format!("-DSKIA_LIBRARY={}", library_dir.join("libskia.a").display()),
    ];

    if arch == Arch::Arm64 {
        args.push("-DPNG_ARM_NEON:STRING=on".to_string());
    }

    args.extend(["-G".to_string(), "Ninja".to_string(), "..".to_string()]);
    args
}
