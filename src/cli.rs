//! CLI argument definitions for dfx.
//!
//! Separated from `main.rs` so that library code (e.g.
//! `pipeline::ExecutionPlan::from_cli`) can reference these types.

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Debug, Parser)]
#[command(name = "dfx")]
#[command(about = "dfx - process Dockerfile build directives")]
#[command(version)]
#[command(propagate_version = true)]
#[command(
    after_help = "Arguments can also be read from a file with --opts-file=PATH.\n\
                  The file's contents are placed before the other arguments."
)]
pub struct Cli {
    /// docker-machine to run docker commands against
    #[arg(long, global = true, env = "DFX_DOCKER_MACHINE")]
    pub machine: Option<String>,

    /// Show what would be done without running docker
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the directives of a build script
    Run(commands::run::RunArgs),

    /// Generate a runtime shell script from RUN and USER instructions
    ///
    /// Build arguments are referenced positionally; their values are
    /// passed when the script is invoked and never written into it.
    Script(commands::script::ScriptArgs),

    /// Print the instructions that restore an image's configuration
    Inspect(commands::inspect::InspectArgs),
}
