//! Output helpers for consistent CLI output.
//!
//! Status lines for people; diagnostics go through `tracing`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dfx::output::Output;
//!
//! Output::success("Tagged myimg:v2");
//! Output::warning("Command FOO not found");
//! Output::dry_run("Would run: docker push myimg:v2");
//! ```

use owo_colors::OwoColorize;

/// Standard output helper for consistent CLI formatting.
pub struct Output;

impl Output {
    /// Print a success message with a green checkmark.
    ///
    /// Example: `✓ Processed 4 directives`
    pub fn success(msg: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), msg.as_ref());
    }

    /// Print a warning message with a yellow warning symbol.
    pub fn warning(msg: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow(), msg.as_ref());
    }

    /// Print a key-value pair with alignment.
    ///
    /// Example: `  image-id:      sha256:abc`
    pub fn kv(key: impl AsRef<str>, value: impl AsRef<str>) {
        println!("  {:<14} {}", format!("{}:", key.as_ref()).cyan(), value.as_ref());
    }

    /// Print a dry-run message.
    ///
    /// Example: `[dry-run] Would run: docker push app:latest`
    pub fn dry_run(msg: impl AsRef<str>) {
        println!("{} {}", "[dry-run]".dimmed(), msg.as_ref().dimmed());
    }
}
