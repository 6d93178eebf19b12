//! Execution plan shared by all subcommands.

use std::sync::Arc;

use crate::Cli;
use crate::command_runner::{CommandRunner, RealCommandRunner};
use crate::docker::DockerCli;

/// Captures the global options that affect how a command executes.
#[derive(Clone)]
pub struct ExecutionPlan {
    /// Whether to perform a dry run
    pub dry_run: bool,
    /// docker-machine to target, if any
    pub machine: Option<String>,
    runner: Arc<dyn CommandRunner>,
}

impl ExecutionPlan {
    /// Create an execution plan from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            dry_run: cli.dry_run,
            machine: cli.machine.clone(),
            runner: Arc::new(RealCommandRunner),
        }
    }

    /// Replace the command runner (tests).
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }

    pub fn docker(&self) -> DockerCli {
        DockerCli::new(self.runner())
            .with_machine(self.machine.clone())
            .with_dry_run(self.dry_run)
    }
}

impl Default for ExecutionPlan {
    fn default() -> Self {
        Self {
            dry_run: false,
            machine: None,
            runner: Arc::new(RealCommandRunner),
        }
    }
}

impl std::fmt::Debug for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionPlan")
            .field("dry_run", &self.dry_run)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}
