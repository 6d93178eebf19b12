//! Error taxonomy for dfx.
//!
//! Only conditions that must abort a build live here. An unknown directive is
//! not an error; see [`Outcome`](crate::directive::Outcome).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DfxError {
    /// Key/value or option text that cannot be split.
    #[error("Invalid command parameters: {0}")]
    Format(String),

    /// A handler precondition on the build context is missing or empty.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Element '{segment}' of path '{path}' does not exist")]
    MissingPath { segment: String, path: String },

    #[error("Element '{segment}' of path '{path}' is not a map")]
    NotAMap { segment: String, path: String },

    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DfxError>;
