// ─── aseprite-build Core ───
// Bootstraps a native Aseprite build from prebuilt Skia and the source release.
//
// Architecture:
//   core/
//     platform/    Supported OS/arch variants, their deps and CMake args
//     deps/        Version matcher, presence checker, group verifier
//     archive/     Zip extraction via host utility or in-process
//     downloader/  Streamed artifact download with progress + unpack
//     process/     External command runner seam
//     build/       Work dirs, failure logs, the staged pipeline
//     config/      Build configuration (defaults, JSON file)
//     report/      Operator-facing status lines

pub mod archive;
pub mod build;
pub mod config;
pub mod deps;
pub mod downloader;
pub mod error;
pub mod http;
pub mod platform;
pub mod process;
pub mod report;
