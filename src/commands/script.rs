//! `dfx script`: turn RUN and USER instructions into a runtime shell script.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::keyvalue::KeyValue;
use crate::script::Script;

#[derive(Debug, Args)]
pub struct ScriptArgs {
    /// File of RUN and USER instructions (a Dockerfile works)
    pub file: PathBuf,

    /// Declare a build argument (repeatable, order sets its position)
    #[arg(long = "build-arg", value_name = "KEY=VALUE")]
    pub build_args: Vec<KeyValue>,

    /// Also print the script's arguments to stderr, shell-quoted
    #[arg(long)]
    pub print_args: bool,
}

pub fn run(args: ScriptArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let script = Script::from_instructions(content.lines(), args.build_args);
    print!("{}", script.render());

    if args.print_args {
        let quoted = shlex::try_join(script.arguments())
            .context("Build argument values cannot be shell-quoted")?;
        eprintln!("{quoted}");
    }
    Ok(())
}
