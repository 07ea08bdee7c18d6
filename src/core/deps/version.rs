use std::sync::OnceLock;

use regex::Regex;
use semver::{Version, VersionReq};
use tracing::{debug, warn};

use crate::core::error::{BuildError, BuildResult};
use crate::core::process::{CommandRunner, Invocation};
use crate::core::report::Reporter;

/// Semantic-version shaped substring: `major.minor.patch[-pre][+build]`.
const SEMVER_PATTERN: &str = r"(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?";

static SEMVER: OnceLock<Option<Regex>> = OnceLock::new();

fn semver_regex() -> Option<&'static Regex> {
    SEMVER
        .get_or_init(|| match Regex::new(SEMVER_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Version pattern failed to compile: {}", e);
                None
            }
        })
        .as_ref()
}

/// Result of asking a tool for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Detected(Version),
    /// The tool ran but printed nothing version-shaped.
    Unparseable(String),
    /// The tool could not be started.
    NotFound,
}

/// First semantic-version substring in `output`, if any.
pub fn extract_version(output: &str) -> Option<Version> {
    let found = semver_regex()?.find(output)?;
    Version::parse(found.as_str()).ok()
}

/// Run `<command> <flag>` and parse the version out of its standard output.
pub async fn detect_version(runner: &dyn CommandRunner, command: &str, flag: &str) -> Detection {
    let invocation = Invocation::new(command).arg(flag);
    let outcome = match runner.run(&invocation).await {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("Could not run {}: {}", invocation, e);
            return Detection::NotFound;
        }
    };

    let stdout = outcome.stdout_text();
    match extract_version(&stdout) {
        Some(version) => Detection::Detected(version),
        None => {
            let first_line = stdout.lines().next().unwrap_or("").trim();
            Detection::Unparseable(first_line.to_string())
        }
    }
}

/// Parse a version range, also accepting space-joined comparators
/// (`">=3.16 <4"`) by rewriting them to the comma form.
pub fn parse_range(expected: &str) -> BuildResult<VersionReq> {
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in expected
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op.push_str(token);
            continue;
        }
        comparators.push(format!("{}{}", std::mem::take(&mut pending_op), token));
    }
    if !pending_op.is_empty() {
        comparators.push(pending_op);
    }

    VersionReq::parse(&comparators.join(", ")).map_err(|source| {
        BuildError::InvalidVersionRange {
            range: expected.to_string(),
            source,
        }
    })
}

/// Check that `command` reports a version inside `expected`.
///
/// Logs one line either way. An invalid range, a missing tool and an
/// unparseable version are all plain mismatches.
pub async fn check_version(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    command: &str,
    expected: &str,
    flag: &str,
) -> bool {
    let range = match parse_range(expected) {
        Ok(range) => range,
        Err(e) => {
            reporter.error(&format!("- cannot check {command}: {e}"));
            return false;
        }
    };

    match detect_version(runner, command, flag).await {
        Detection::Detected(version) => {
            let matches = range.matches(&version);
            if matches {
                reporter.info(&format!("- detected valid {command} version {version}"));
            } else {
                reporter.error(&format!(
                    "- expected {command} version matching {expected}, got {version}"
                ));
            }
            matches
        }
        Detection::Unparseable(first_line) => {
            reporter.error(&format!(
                "- expected {command} version matching {expected}, but could not read a version from {first_line:?}"
            ));
            false
        }
        Detection::NotFound => {
            reporter.error(&format!(
                "- expected {command} version matching {expected}, but {command} was not found"
            ));
            false
        }
    }
}
