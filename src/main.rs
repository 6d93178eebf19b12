use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dfx::commands;
use dfx::options;
use dfx::pipeline;
use dfx::{Cli, Commands};

/// Command line arguments with any `--opts-file` expanded in place.
fn expanded_args() -> Result<Vec<String>> {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "dfx".to_string());
    let rest: Vec<String> = args.collect();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let mut expanded = vec![program];
    expanded.extend(options::inject_options_file(&rest, &cwd)?);
    Ok(expanded)
}

fn main() -> Result<()> {
    // Initialize tracing with RUST_LOG env filter
    // e.g., RUST_LOG=dfx=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(expanded_args()?);
    let plan = pipeline::ExecutionPlan::from_cli(&cli);

    tracing::debug!(
        dry_run = plan.dry_run,
        machine = ?plan.machine,
        "Execution plan created"
    );

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &plan),
        Commands::Script(args) => commands::script::run(args),
        Commands::Inspect(args) => commands::inspect::run(args, &plan),
    }
}
