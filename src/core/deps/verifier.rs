use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::core::config::BuildConfig;
use crate::core::error::{BuildError, BuildResult};
use crate::core::process::CommandRunner;
use crate::core::report::Reporter;

use super::presence::check_presence;
use super::version::check_version;

/// A single prerequisite of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A tool on `PATH` whose `<command> <flag>` output must satisfy `range`.
    Tool {
        command: String,
        range: String,
        flag: String,
    },
    /// A filesystem path that must exist.
    Path { name: String, path: PathBuf },
}

impl Requirement {
    pub fn tool(command: &str, range: &str, flag: &str) -> Self {
        Requirement::Tool {
            command: command.to_string(),
            range: range.to_string(),
            flag: flag.to_string(),
        }
    }

    pub fn path(name: &str, path: impl Into<PathBuf>) -> Self {
        Requirement::Path {
            name: name.to_string(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Tool { command, range, .. } => write!(f, "{} {}", command, range),
            Requirement::Path { name, path } => write!(f, "{} at {}", name, path.display()),
        }
    }
}

/// Requirements that are checked and reported together.
#[derive(Debug, Clone)]
pub struct DependencyGroup {
    pub name: String,
    pub requirements: Vec<Requirement>,
}

impl DependencyGroup {
    pub fn new(name: &str, requirements: Vec<Requirement>) -> Self {
        Self {
            name: name.to_string(),
            requirements,
        }
    }

    /// Configuration generator and build executor, needed everywhere.
    pub fn common(config: &BuildConfig) -> Self {
        Self::new(
            "common",
            vec![
                Requirement::tool("cmake", &config.cmake_version, &config.version_flag),
                Requirement::tool("ninja", &config.ninja_version, &config.version_flag),
            ],
        )
    }
}

/// Runs every requirement of a group, then fails if any of them failed.
pub struct DependencyVerifier<'a> {
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
}

impl<'a> DependencyVerifier<'a> {
    pub fn new(runner: &'a dyn CommandRunner, reporter: &'a dyn Reporter) -> Self {
        Self { runner, reporter }
    }

    /// Check one requirement, logging the result. Never stops the group.
    pub async fn check(&self, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Tool {
                command,
                range,
                flag,
            } => check_version(self.runner, self.reporter, command, range, flag).await,
            Requirement::Path { name, path } => check_presence(self.reporter, name, path).await,
        }
    }

    /// Check the whole group. Every requirement is attempted before failing,
    /// so the error lists all of the missing ones.
    pub async fn verify(&self, group: &DependencyGroup) -> BuildResult<()> {
        self.reporter.info(&format!(
            "attempting to search for {} dependencies",
            group.name
        ));

        let mut missing = Vec::new();
        for requirement in &group.requirements {
            if !self.check(requirement).await {
                missing.push(requirement.to_string());
            }
        }

        debug!(
            "Dependency group '{}': {} checked, {} missing",
            group.name,
            group.requirements.len(),
            missing.len()
        );

        if !missing.is_empty() {
            return Err(BuildError::MissingDependencies {
                group: group.name.clone(),
                missing,
            });
        }

        self.reporter
            .success(&format!("all {} dependencies were found", group.name));
        Ok(())
    }
}
