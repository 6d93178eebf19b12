//! `dfx inspect`: print the instructions that restore an image's config.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::inspect::ImageConfig;
use crate::pipeline::ExecutionPlan;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Image to inspect with `docker inspect`
    #[arg(required_unless_present = "file")]
    pub image: Option<String>,

    /// Read a saved `docker inspect` descriptor instead
    #[arg(long, conflicts_with = "image")]
    pub file: Option<PathBuf>,

    /// Print a single .Config field as docker formats it
    #[arg(long, requires = "image")]
    pub field: Option<String>,
}

pub fn run(args: InspectArgs, plan: &ExecutionPlan) -> Result<()> {
    let docker = plan.docker();

    if let (Some(field), Some(image)) = (&args.field, &args.image) {
        println!("{}", docker.inspect_field(field, image)?);
        return Ok(());
    }

    let config = match (&args.file, &args.image) {
        (Some(file), _) => ImageConfig::from_file(file)
            .with_context(|| format!("Failed to load descriptor {}", file.display()))?,
        (None, Some(image)) => ImageConfig::from_descriptor(&docker.inspect(image)?),
        (None, None) => bail!("Either an image or --file is required"),
    };

    for line in config.instructions() {
        println!("{line}");
    }
    Ok(())
}
