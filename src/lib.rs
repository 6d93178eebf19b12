//! dfx - Dockerfile build directives
//!
//! A library for processing the directives of a Docker build script: options
//! extracted from a flat command line, build arguments turned into positional
//! shell references, named directives dispatched against a shared build
//! context, and image configuration restored from `docker inspect` output.
//!
//! # Directives
//!
//! One per line, `[#!]NAME[ PARAMS]`. Built in:
//!
//! - `TAG [name][:tag]`: tag the built image, recording `tagged-image-name`
//! - `PUSH`: push `image-name`, falling back to `tagged-image-name`
//!
//! Unknown directives are logged and skipped; any other failure stops the
//! build.

pub mod cli;
pub mod command_runner;
pub mod commands;
pub mod context;
pub mod directive;
pub mod docker;
pub mod error;
pub mod handlers;
pub mod image;
pub mod inspect;
pub mod keyvalue;
pub mod options;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod script;

pub use cli::{Cli, Commands};
pub use context::BuildContext;
pub use directive::{Dispatcher, Outcome, Registry};
pub use error::DfxError;
pub use keyvalue::KeyValue;
pub use options::{Flag, FlagSet};
pub use script::Script;
