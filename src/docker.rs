//! The docker CLI as seen by directive handlers.
//!
//! Commands are passed to `sh -c` as whole command lines. When a
//! docker-machine is configured its environment is evaluated first, in the
//! same subshell.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::command_runner::CommandRunner;
use crate::error::DfxError;
use crate::inspect::inspect_format_command;
use crate::output::Output;

pub struct DockerCli {
    runner: Arc<dyn CommandRunner>,
    machine: Option<String>,
    dry_run: bool,
}

impl DockerCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            machine: None,
            dry_run: false,
        }
    }

    /// Run every command against the named docker-machine.
    pub fn with_machine(mut self, machine: Option<String>) -> Self {
        self.machine = machine;
        self
    }

    /// Log commands instead of running them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// The command line handed to `sh -c`.
    pub fn command_line(&self, command: &str) -> String {
        match &self.machine {
            Some(machine) => format!(
                "(eval \"$(docker-machine env --shell=bash {machine})\";{command})"
            ),
            None => command.to_string(),
        }
    }

    /// Run `command`, streaming its output; a non-zero exit is an error.
    pub fn exec(&self, command: &str) -> Result<()> {
        info!("{}", command);
        if self.dry_run {
            Output::dry_run(format!("Would run: {command}"));
            return Ok(());
        }

        let line = self.command_line(command);
        let status = self.runner.run_status("sh", &["-c", &line])?;
        if !status.success() {
            return Err(DfxError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }

    /// Run `command` and return its stdout; a non-zero exit is an error.
    pub fn read(&self, command: &str) -> Result<String> {
        info!("{}", command);
        if self.dry_run {
            Output::dry_run(format!("Would run: {command}"));
            return Ok(String::new());
        }

        let line = self.command_line(command);
        let output = self.runner.run_output("sh", &["-c", &line])?;
        if !output.status.success() {
            return Err(DfxError::CommandFailed {
                command: command.to_string(),
                code: output.status.code(),
            }
            .into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("{}", stdout.trim_end());
        Ok(stdout)
    }

    pub fn tag(&self, image_id: &str, target: &str) -> Result<()> {
        self.read(&format!("docker tag {image_id} {target}"))?;
        Ok(())
    }

    /// Push `image`, letting docker's progress output through.
    pub fn push(&self, image: &str) -> Result<()> {
        self.exec(&format!("docker push {image}"))
    }

    /// The full `docker inspect` descriptor of `image`.
    ///
    /// In dry-run mode this is an empty array.
    pub fn inspect(&self, image: &str) -> Result<Value> {
        let stdout = self.read(&format!("docker inspect {image}"))?;
        if self.dry_run {
            return Ok(Value::Array(Vec::new()));
        }
        serde_json::from_str(&stdout)
            .with_context(|| format!("Failed to parse docker inspect output for {image}"))
    }

    /// A single `.Config` field of `image`, as printed by docker.
    pub fn inspect_field(&self, key: &str, image: &str) -> Result<String> {
        let stdout = self.read(&inspect_format_command(key, image))?;
        Ok(stdout.trim_end().to_string())
    }
}
