pub mod artifact;
pub mod client;
pub mod progress;

pub use artifact::ArtifactDescriptor;
pub use client::Downloader;
pub use progress::{ProgressSample, Renderer};
