//! Option extraction from flat token sequences.
//!
//! A [`Flag`] describes one option (short name, long name, `--long=value`
//! support) and carries its own scan state. A [`FlagSet`] hunts for several
//! flags in a single left-to-right pass over the same tokens, optionally
//! blanking the consumed tokens so the rest of the command line can be
//! rebuilt without them.
//!
//! # Example
//!
//! ```rust
//! use dfx::options::{Flag, FlagSet};
//!
//! let tokens: Vec<String> = ["build", "-t", "app", "--build-arg=A=1", "."]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let scan = FlagSet::new(vec![
//!     Flag::new().short("-t").long("--tag").cleanup(),
//!     Flag::new().long("--build-arg").equals().cleanup().repeatable(),
//! ])
//! .scan(&tokens);
//!
//! assert_eq!(scan.value(0), Some("app"));
//! assert_eq!(scan.values(1), ["A=1"]);
//! assert_eq!(scan.remaining(), ["build", "."]);
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Long flag naming a file of extra options.
pub const OPTS_FILE_FLAG: &str = "--opts-file";

/// Where a flag is in its scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    Idle,
    /// The flag name was seen; the next token is its value.
    WaitingForValue,
    Matched,
}

/// A command line option and its scan state.
#[derive(Debug, Clone, Default)]
pub struct Flag {
    short: Option<String>,
    long: Option<String>,
    equals: bool,
    cleanup: bool,
    repeatable: bool,

    /// Index of the flag name while waiting for its value.
    pending: Option<usize>,
    value: Option<String>,
    values: Vec<String>,
    positions: Vec<usize>,
}

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    /// Accept `--long=value` in addition to `--long value`.
    pub fn equals(mut self) -> Self {
        self.equals = true;
        self
    }

    /// Blank the matched tokens when scanned through a [`FlagSet`].
    pub fn cleanup(mut self) -> Self {
        self.cleanup = true;
        self
    }

    /// Allow the flag to match more than once, accumulating every value.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn state(&self) -> FlagState {
        if self.value.is_some() {
            FlagState::Matched
        } else if self.pending.is_some() {
            FlagState::WaitingForValue
        } else {
            FlagState::Idle
        }
    }

    /// True once a value has been captured (and not yet reset).
    pub fn found(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Every value captured by a repeatable flag, in order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Token positions consumed by the last match.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Return to `Idle`. Accumulated values are kept.
    pub fn reset(&mut self) {
        self.pending = None;
        self.value = None;
        self.positions.clear();
    }

    /// Feed one token at `index` through the state machine.
    pub fn verify(&mut self, token: &str, index: usize) {
        if let Some(name_index) = self.pending.take() {
            self.capture(token, vec![name_index, index]);
        } else if self.short.as_deref() == Some(token) || self.long.as_deref() == Some(token) {
            self.pending = Some(index);
        } else if let Some(value) = self.equals_value(token) {
            self.capture(value, vec![index]);
        }
    }

    fn equals_value<'t>(&self, token: &'t str) -> Option<&'t str> {
        if !self.equals {
            return None;
        }
        let long = self.long.as_deref()?;
        token.strip_prefix(long)?.strip_prefix('=')
    }

    fn capture(&mut self, value: &str, positions: Vec<usize>) {
        if self.repeatable {
            self.values.push(value.to_string());
        }
        self.value = Some(value.to_string());
        self.positions = positions;
    }
}

/// Several flags scanned together over one token sequence.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new(flags: Vec<Flag>) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Evaluate the token at `index` against every flag still looking.
    ///
    /// Matched cleanup flags blank their tokens in place; the blanked
    /// positions are returned. Repeatable flags are re-armed after a match.
    pub fn find(&mut self, tokens: &mut [String], index: usize) -> Vec<usize> {
        let mut cleared = Vec::new();
        let Some(token) = tokens.get(index).cloned() else {
            return cleared;
        };

        for flag in self.flags.iter_mut().filter(|f| !f.found()) {
            flag.verify(&token, index);
            if !flag.found() {
                continue;
            }
            if flag.cleanup {
                for &i in flag.positions() {
                    if let Some(slot) = tokens.get_mut(i) {
                        slot.clear();
                        cleared.push(i);
                    }
                }
            }
            if flag.repeatable {
                flag.reset();
            }
        }
        cleared
    }

    /// Scan a whole token sequence without touching the caller's copy.
    pub fn scan(mut self, tokens: &[String]) -> Scan {
        let mut blanked = tokens.to_vec();
        let mut cleared = BTreeSet::new();
        for index in 0..blanked.len() {
            cleared.extend(self.find(&mut blanked, index));
        }
        debug!(cleared = cleared.len(), "Scanned {} tokens", blanked.len());
        Scan {
            flags: self.flags,
            blanked,
            cleared,
        }
    }
}

/// Result of [`FlagSet::scan`].
#[derive(Debug, Clone)]
pub struct Scan {
    flags: Vec<Flag>,
    blanked: Vec<String>,
    cleared: BTreeSet<usize>,
}

impl Scan {
    pub fn flag(&self, index: usize) -> Option<&Flag> {
        self.flags.get(index)
    }

    /// Value captured by a single-instance flag.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.flags.get(index).and_then(Flag::value)
    }

    /// Values accumulated by a repeatable flag.
    pub fn values(&self, index: usize) -> &[String] {
        self.flags.get(index).map(Flag::values).unwrap_or_default()
    }

    /// Tokens with consumed positions blanked, index-aligned with the input.
    pub fn blanked(&self) -> &[String] {
        &self.blanked
    }

    /// Tokens that were not consumed, in their original order.
    pub fn remaining(&self) -> Vec<String> {
        self.blanked
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.cleared.contains(i))
            .map(|(_, t)| t.clone())
            .collect()
    }
}

/// Expand `--opts-file=PATH` found in `tokens`.
///
/// The flag and its value are removed. When the file exists (relative paths
/// resolve against `cwd`), each line is split on whitespace and prepended
/// to the tokens in turn, so the last line of the file ends up first.
pub fn inject_options_file(tokens: &[String], cwd: &Path) -> Result<Vec<String>> {
    let mut blanked = tokens.to_vec();
    let mut set = FlagSet::new(vec![Flag::new().long(OPTS_FILE_FLAG).equals().cleanup()]);
    let mut cleared = BTreeSet::new();

    for index in 0..blanked.len() {
        cleared.extend(set.find(&mut blanked, index));
        if set.flags()[0].found() {
            break;
        }
    }

    let remaining: Vec<String> = blanked
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !cleared.contains(i))
        .map(|(_, t)| t)
        .collect();

    let Some(file) = set.flags()[0].value() else {
        return Ok(remaining);
    };

    let path = cwd.join(file);
    if !path.exists() {
        warn!("Options file {} does not exist, ignoring", path.display());
        return Ok(remaining);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read options file {}", path.display()))?;
    let mut injected = remaining;
    let mut count = 0;
    for line in content.lines() {
        let mut line_tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        count += line_tokens.len();
        line_tokens.append(&mut injected);
        injected = line_tokens;
    }
    debug!("Injected {} options from {}", count, path.display());

    Ok(injected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_separate_value() {
        let mut flag = Flag::new().short("-f").long("--file");
        flag.verify("-f", 3);
        assert_eq!(flag.state(), FlagState::WaitingForValue);
        assert!(!flag.found());
        flag.verify("Dockerfile", 4);
        assert_eq!(flag.state(), FlagState::Matched);
        assert_eq!(flag.value(), Some("Dockerfile"));
        assert_eq!(flag.positions(), [3, 4]);
    }

    #[test]
    fn test_equals_value_splits_once() {
        let mut flag = Flag::new().long("--build-arg").equals();
        flag.verify("--build-arg=A=b=c", 2);
        assert_eq!(flag.value(), Some("A=b=c"));
        assert_eq!(flag.positions(), [2]);
    }

    #[test]
    fn test_equals_requires_opt_in() {
        let mut flag = Flag::new().long("--file");
        flag.verify("--file=x", 0);
        assert!(!flag.found());
        assert_eq!(flag.state(), FlagState::Idle);
    }

    #[test]
    fn test_equals_never_applies_to_short_name() {
        let mut flag = Flag::new().short("-f").equals();
        flag.verify("-f=x", 0);
        assert!(!flag.found());
    }

    #[test]
    fn test_short_only_flag_ignores_long_form() {
        let scan = FlagSet::new(vec![Flag::new().short("-t")]).scan(&tokens("--tag x"));
        assert_eq!(scan.value(0), None);
    }

    #[test]
    fn test_long_only_flag_ignores_short_form() {
        let scan = FlagSet::new(vec![Flag::new().long("--tag")]).scan(&tokens("-t x"));
        assert_eq!(scan.value(0), None);
    }

    #[test]
    fn test_equals_prefix_must_be_followed_by_equals() {
        let mut flag = Flag::new().long("--tag").equals();
        flag.verify("--tagged=x", 0);
        assert!(!flag.found());
    }

    #[test]
    fn test_single_instance_first_wins() {
        let scan = FlagSet::new(vec![Flag::new().short("-t").cleanup()])
            .scan(&tokens("-t one -t two"));
        assert_eq!(scan.value(0), Some("one"));
        assert_eq!(scan.remaining(), tokens("-t two"));
    }

    #[test]
    fn test_repeatable_accumulates() {
        let scan = FlagSet::new(vec![Flag::new().long("--build-arg").equals().repeatable()])
            .scan(&tokens("--build-arg A=1 x --build-arg=B=2"));
        assert_eq!(scan.values(0), ["A=1", "B=2"]);
        let flag = scan.flag(0).unwrap();
        assert!(!flag.found());
        assert_eq!(flag.state(), FlagState::Idle);
    }

    #[test]
    fn test_cleanup_blanks_in_place() {
        let mut toks = tokens("build -t app .");
        let mut set = FlagSet::new(vec![Flag::new().short("-t").cleanup()]);
        for i in 0..toks.len() {
            set.find(&mut toks, i);
        }
        assert_eq!(toks, ["build", "", "", "."]);
    }

    #[test]
    fn test_without_cleanup_tokens_stay() {
        let scan = FlagSet::new(vec![Flag::new().short("-t")]).scan(&tokens("build -t app ."));
        assert_eq!(scan.value(0), Some("app"));
        assert_eq!(scan.blanked(), tokens("build -t app .").as_slice());
        assert_eq!(scan.remaining(), tokens("build -t app ."));
    }

    #[test]
    fn test_several_flags_in_one_pass() {
        let scan = FlagSet::new(vec![
            Flag::new().short("-f").long("--file").equals().cleanup(),
            Flag::new().long("--build-arg").equals().cleanup().repeatable(),
            Flag::new().short("-t").cleanup(),
        ])
        .scan(&tokens(
            "build --build-arg A=1 -t img --file=df --build-arg=B=2 --pull .",
        ));
        assert_eq!(scan.value(0), Some("df"));
        assert_eq!(scan.values(1), ["A=1", "B=2"]);
        assert_eq!(scan.value(2), Some("img"));
        assert_eq!(scan.remaining(), tokens("build --pull ."));
        assert_eq!(scan.blanked().len(), 9);
    }

    #[test]
    fn test_trailing_flag_without_value_is_not_found() {
        let scan = FlagSet::new(vec![Flag::new().short("-t").cleanup()]).scan(&tokens("build -t"));
        assert_eq!(scan.flag(0).unwrap().state(), FlagState::WaitingForValue);
        assert_eq!(scan.value(0), None);
        assert_eq!(scan.remaining(), tokens("build -t"));
    }

    #[test]
    fn test_empty_value_is_found() {
        let toks = vec!["--tag=".to_string()];
        let scan = FlagSet::new(vec![Flag::new().long("--tag").equals()]).scan(&toks);
        assert_eq!(scan.value(0), Some(""));
    }

    #[test]
    fn test_original_empty_tokens_survive_compaction() {
        let toks = vec!["a".to_string(), String::new(), "-t".into(), "x".into()];
        let scan = FlagSet::new(vec![Flag::new().short("-t").cleanup()]).scan(&toks);
        assert_eq!(scan.remaining(), ["a", ""]);
    }

    #[test]
    fn test_inject_without_flag_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let out = inject_options_file(&tokens("build ."), dir.path()).unwrap();
        assert_eq!(out, tokens("build ."));
    }

    #[test]
    fn test_inject_prepends_file_tokens() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("opts"), "--pull\n-t  app:1\n\n--no-cache\n").unwrap();
        let out =
            inject_options_file(&tokens("build --opts-file=opts ."), dir.path()).unwrap();
        assert_eq!(out, tokens("--no-cache -t app:1 --pull build ."));
    }

    #[test]
    fn test_inject_later_lines_come_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("o"), "--first\n--second\n").unwrap();
        let out = inject_options_file(&tokens("--opts-file=o run"), dir.path()).unwrap();
        assert_eq!(out, tokens("--second --first run"));
    }

    #[test]
    fn test_inject_separate_value_form() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("opts"), "--pull").unwrap();
        let out = inject_options_file(&tokens("--opts-file opts build"), dir.path()).unwrap();
        assert_eq!(out, tokens("--pull build"));
    }

    #[test]
    fn test_inject_missing_file_drops_flag_only() {
        let dir = tempfile::tempdir().unwrap();
        let out =
            inject_options_file(&tokens("build --opts-file=nope ."), dir.path()).unwrap();
        assert_eq!(out, tokens("build ."));
    }

    #[test]
    fn test_inject_uses_first_flag_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "--from-a").unwrap();
        fs::write(dir.path().join("b"), "--from-b").unwrap();
        let out = inject_options_file(
            &tokens("--opts-file=a x --opts-file=b"),
            dir.path(),
        )
        .unwrap();
        assert_eq!(out, tokens("--from-a x --opts-file=b"));
    }
}
