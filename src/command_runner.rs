//! Abstraction over external command execution for testability.
//!
//! Every process dfx starts (docker, docker-machine via `sh -c`) goes
//! through the [`CommandRunner`] trait so handlers can be tested in-process.
//!
//! # Production Usage
//!
//! [`RealCommandRunner`] delegates to [`std::process::Command`] and is what
//! the `dfx` binary hands to [`DockerCli`](crate::docker::DockerCli).
//!
//! # Testing Usage
//!
//! [`testing::MockCommandRunner`] records all calls and returns canned
//! responses, so directive handlers can be tested without a Docker daemon.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus, Output};

/// Trait for abstracting external command execution.
///
/// Stored as `Arc<dyn CommandRunner>` so handler closures can share it.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its full output (stdout + stderr + exit status).
    fn run_output(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a command and return only its exit status (inherits stdio).
    fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

/// Production implementation that delegates to [`std::process::Command`].
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_output(&self, program: &str, args: &[&str]) -> Result<Output> {
        Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run '{program}'"))
    }

    fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run '{program}'"))
    }
}
