//! Key/value pair parsing.
//!
//! Accepts `key value` and `key=value`. The space form wins when both
//! delimiters are present, and only the first delimiter splits.

use crate::error::{DfxError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `key value` or `key=value`.
    pub fn parse(text: &str) -> Result<Self> {
        let (key, value) = text
            .split_once(' ')
            .or_else(|| text.split_once('='))
            .ok_or_else(|| DfxError::Format(text.to_string()))?;
        Ok(Self::new(key, value))
    }
}

impl FromStr for KeyValue {
    type Err = DfxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_form() {
        let kv = KeyValue::parse("a b").unwrap();
        assert_eq!(kv.key, "a");
        assert_eq!(kv.value, "b");
    }

    #[test]
    fn test_equals_form_splits_once() {
        let kv = KeyValue::parse("a=b=c").unwrap();
        assert_eq!(kv, KeyValue::new("a", "b=c"));
    }

    #[test]
    fn test_space_wins_over_equals() {
        let kv = KeyValue::parse("NAME a=b c").unwrap();
        assert_eq!(kv, KeyValue::new("NAME", "a=b c"));
    }

    #[test]
    fn test_empty_value_is_allowed() {
        assert_eq!(KeyValue::parse("a=").unwrap(), KeyValue::new("a", ""));
    }

    #[test]
    fn test_no_delimiter_is_format_error() {
        let err = KeyValue::parse("abc").unwrap_err();
        assert!(matches!(err, DfxError::Format(ref s) if s == "abc"));
    }

    #[test]
    fn test_from_str() {
        let kv: KeyValue = "TOKEN=s3cr3t".parse().unwrap();
        assert_eq!(kv.to_string(), "TOKEN=s3cr3t");
    }
}
