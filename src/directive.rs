//! Directive registry and dispatcher.
//!
//! A directive is one build-script line, `[#!]NAME[ PARAMS]`. The name is
//! looked up case-insensitively in a [`Registry`] and its handler runs
//! against the shared [`BuildContext`].
//!
//! An unknown name is reported as [`Outcome::Unknown`] and the build goes
//! on. Any error returned by a handler stops the build.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::context::BuildContext;
use crate::docker::DockerCli;
use crate::handlers;

/// A directive handler: `(params, context)`.
pub type Handler = Box<dyn Fn(Option<&str>, &mut BuildContext) -> Result<()>>;

/// One parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub line: &'a str,
    /// Upper-cased name with leading `#`/`!` removed.
    pub instruction: String,
    /// Everything after the first whitespace, if any.
    pub params: Option<&'a str>,
}

impl<'a> Directive<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim_start();
        let (head, params) = match trimmed.split_once(char::is_whitespace) {
            Some((head, params)) => (head, Some(params)),
            None => (trimmed, None),
        };
        Self {
            line,
            instruction: head.trim_start_matches(['#', '!']).to_ascii_uppercase(),
            params,
        }
    }
}

/// Directive name to handler table.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `TAG` and `PUSH` directives.
    pub fn with_builtins(docker: Arc<DockerCli>) -> Self {
        let mut registry = Self::new();
        handlers::register_builtins(&mut registry, docker);
        registry
    }

    /// Register `handler` under `name` (case-insensitive).
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(Option<&str>, &mut BuildContext) -> Result<()> + 'static,
    {
        let name = name.to_ascii_uppercase();
        if self.handlers.contains_key(&name) {
            debug!("Replacing handler for {}", name);
        }
        self.handlers.insert(name, Box::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(&name.to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// What happened to a single directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    /// No handler is registered for this instruction.
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    /// Unknown instructions, in the order they were skipped.
    pub unknown: Vec<String>,
}

/// Runs directives against a registry.
pub struct Dispatcher<'r> {
    registry: &'r Registry,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn execute(&self, line: &str, context: &mut BuildContext) -> Result<Outcome> {
        let directive = Directive::parse(line);
        let Some(handler) = self.registry.get(&directive.instruction) else {
            warn!("Command {} not found", line);
            return Ok(Outcome::Unknown(directive.instruction));
        };

        info!("{}", line);
        handler(directive.params, context).with_context(|| format!("Directive failed: {line}"))?;
        Ok(Outcome::Executed)
    }

    /// Execute `lines` in order, stopping at the first failing directive.
    ///
    /// Blank lines are skipped.
    pub fn run<'l>(
        &self,
        lines: impl IntoIterator<Item = &'l str>,
        context: &mut BuildContext,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for line in lines.into_iter().filter(|l| !l.trim().is_empty()) {
            match self.execute(line, context)? {
                Outcome::Executed => summary.executed += 1,
                Outcome::Unknown(name) => summary.unknown.push(name),
            }
        }
        Ok(summary)
    }
}
