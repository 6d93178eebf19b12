//! Shell script generation with build argument substitution.
//!
//! Build arguments never appear in the generated text. Each `${KEY}` is
//! replaced by the positional parameter matching the argument's place in the
//! declared list, and the values are passed to the script when it is invoked
//! (see [`Script::arguments`]).
//!
//! Commands added after [`Script::su`] run through `su -c '...' <user>`. The
//! command string is then parsed twice, once by the script's shell and once
//! by the user's shell, so each reference is re-quoted with `printf %q`
//! before the second parse sees it. Values holding control characters (a
//! newline, say) come out of `printf %q` as `$'...'`, which only bash reads
//! back correctly; the target user's login shell must be bash for those.

use tracing::debug;

use crate::keyvalue::KeyValue;

pub const SCRIPT_HEAD: &str = "#!/usr/bin/env bash\n\n";
pub const FAIL_ON_ERROR: &str = "set -e\n";

#[derive(Debug, Clone, Default)]
pub struct Script {
    lines: Vec<String>,
    user: Option<String>,
    build_args: Vec<KeyValue>,
}

impl Script {
    pub fn new(build_args: Vec<KeyValue>) -> Self {
        Self {
            lines: Vec::new(),
            user: None,
            build_args,
        }
    }

    /// Build a script from `RUN` and `USER` instructions.
    ///
    /// `USER root` switches back to the default user. Other instructions are
    /// not part of the runtime script and are skipped.
    pub fn from_instructions<'l>(
        instructions: impl IntoIterator<Item = &'l str>,
        build_args: Vec<KeyValue>,
    ) -> Self {
        let mut script = Self::new(build_args);
        for line in instructions {
            let line = line.trim();
            let (instruction, rest) = line
                .split_once(char::is_whitespace)
                .map(|(i, r)| (i, r.trim()))
                .unwrap_or((line, ""));
            match instruction.to_ascii_uppercase().as_str() {
                "RUN" => script.add(rest),
                "USER" if rest == "root" => script.root(),
                "USER" => script.su(rest),
                _ => debug!("Skipping instruction: {}", line),
            }
        }
        script
    }

    /// Run subsequent commands as `user`.
    pub fn su(&mut self, user: impl Into<String>) {
        self.user = Some(user.into());
    }

    /// Run subsequent commands as the default user.
    pub fn root(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn add(&mut self, command: &str) {
        let line = match &self.user {
            None => self.substitute(command.to_string(), positional),
            Some(user) => {
                // Close the su -c quote around our own single quotes.
                let escaped = command.replace('\'', r"'\''");
                let command = self.substitute(escaped, |i| {
                    format!(r#"'"$(printf %q "{}")"'"#, positional(i))
                });
                let user = shlex::try_quote(user).unwrap_or_else(|_| user.as_str().into());
                format!("su -c '{command}' {user}")
            }
        };
        self.lines.push(line + "\n");
    }

    fn substitute(&self, mut command: String, reference: impl Fn(usize) -> String) -> String {
        for (i, arg) in self.build_args.iter().enumerate() {
            let placeholder = format!("${{{}}}", arg.key);
            command = command.replace(&placeholder, &reference(i + 1));
        }
        command
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Build argument values in positional order.
    pub fn arguments(&self) -> Vec<&str> {
        self.build_args.iter().map(|a| a.value.as_str()).collect()
    }

    pub fn render(&self) -> String {
        let mut text = String::from(SCRIPT_HEAD);
        text.push_str(FAIL_ON_ERROR);
        for line in &self.lines {
            text.push_str(line);
        }
        text
    }
}

/// `$1`..`$9`, then `${10}` and up.
fn positional(i: usize) -> String {
    if i < 10 {
        format!("${i}")
    } else {
        format!("${{{i}}}")
    }
}
