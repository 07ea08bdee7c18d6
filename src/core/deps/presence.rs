use std::path::Path;

use crate::core::report::Reporter;

/// Report whether `path` exists right now. Never fails; unreadable counts as absent.
pub async fn check_presence(reporter: &dyn Reporter, name: &str, path: &Path) -> bool {
    let present = tokio::fs::try_exists(path).await.unwrap_or(false);

    if present {
        reporter.info(&format!("- detected {} at {}", name, path.display()));
    } else {
        reporter.error(&format!(
            "- expected {} at {} but it was not found",
            name,
            path.display()
        ));
    }

    present
}
