// Test double for `CommandRunner`: answers from a closure and records calls.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CommandRunner, Invocation, ProcessOutcome};
use crate::core::error::{BuildError, BuildResult};

type Script = Box<dyn Fn(&Invocation) -> Option<ProcessOutcome> + Send + Sync>;

pub struct ScriptedRunner {
    script: Script,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// `None` from the script behaves like a program that is not installed.
    pub fn new(
        script: impl Fn(&Invocation) -> Option<ProcessOutcome> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> BuildResult<ProcessOutcome> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        (self.script)(invocation).ok_or_else(|| BuildError::Spawn {
            program: invocation.program.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

pub fn ok_with_stdout(stdout: &str) -> Option<ProcessOutcome> {
    Some(ProcessOutcome {
        success: true,
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    })
}

pub fn failed_with_stderr(stderr: &str) -> Option<ProcessOutcome> {
    Some(ProcessOutcome {
        success: false,
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    })
}
