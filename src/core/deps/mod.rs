pub mod presence;
pub mod verifier;
pub mod version;

pub use presence::check_presence;
pub use verifier::{DependencyGroup, DependencyVerifier, Requirement};
pub use version::{check_version, detect_version, extract_version, parse_range, Detection};
