//! `dfx run`: execute the directives of a build script.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::context::{BuildContext, IMAGE_ID, IMAGE_NAME};
use crate::directive::{Dispatcher, Registry, RunSummary};
use crate::keyvalue::KeyValue;
use crate::output::Output;
use crate::pipeline::ExecutionPlan;

/// Marker for directives embedded in a Dockerfile.
const EMBEDDED_PREFIX: &str = "#!";

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Build script with one directive per line
    pub file: PathBuf,

    /// Seed the build context (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<KeyValue>,

    /// Id of the built image
    #[arg(long)]
    pub image_id: Option<String>,

    /// Name of the built image
    #[arg(long)]
    pub image_name: Option<String>,

    /// Only run `#!` lines, leaving the rest of a Dockerfile alone
    #[arg(long)]
    pub embedded: bool,

    /// Print the build context after the run
    #[arg(long)]
    pub print_context: bool,
}

impl RunArgs {
    fn initial_context(&self) -> BuildContext {
        let mut context: BuildContext = self
            .set
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()))
            .collect();
        if let Some(id) = &self.image_id {
            context.set(IMAGE_ID, id.as_str());
        }
        if let Some(name) = &self.image_name {
            context.set(IMAGE_NAME, name.as_str());
        }
        context
    }
}

/// The directive lines of `content`.
pub fn directive_lines(content: &str, embedded: bool) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !embedded || line.trim_start().starts_with(EMBEDDED_PREFIX))
        .collect()
}

pub fn run(args: RunArgs, plan: &ExecutionPlan) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read build script {}", args.file.display()))?;

    let mut context = args.initial_context();
    let registry = Registry::with_builtins(Arc::new(plan.docker()));
    let lines = directive_lines(&content, args.embedded);
    let summary = Dispatcher::new(&registry).run(lines, &mut context)?;

    report(&summary, &registry);
    if args.print_context {
        for (key, value) in context.iter() {
            Output::kv(key, value);
        }
    }
    Ok(())
}

fn report(summary: &RunSummary, registry: &Registry) {
    if !summary.unknown.is_empty() {
        let known = registry.names().join(", ");
        for name in &summary.unknown {
            Output::warning(format!("Command {name} not found (known: {known})"));
        }
    }
    Output::success(format!("Processed {} directives", summary.executed));
}
