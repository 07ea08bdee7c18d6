pub mod runner;

#[cfg(test)]
pub mod scripted;

pub use runner::{CommandRunner, Invocation, ProcessOutcome, SystemRunner};
