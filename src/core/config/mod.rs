pub mod build_config;

pub use build_config::{default_config_path, BuildConfig, ExtractorKind};
