//! Reconstruct Dockerfile instructions from an inspected image.
//!
//! `docker inspect` prints a JSON array with one descriptor per image. The
//! fields that a rebuilt image would otherwise lose (`Cmd`, `Entrypoint`,
//! `Env`, `Labels`) are read out of `Config` with [`path::get`] and rendered
//! back as instructions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::path;

pub const CMD: &str = "Cmd";
pub const ENTRYPOINT: &str = "Entrypoint";
pub const ENV: &str = "Env";
pub const LABELS: &str = "Labels";

/// `docker inspect -f '{{ .Config.<key> }}' <image>`
pub fn inspect_format_command(key: &str, image: &str) -> String {
    format!("docker inspect -f '{{{{ .Config.{key} }}}}' {image}")
}

/// Render a list in exec form: `["sh", "-c", "echo \"hi\""]`.
pub fn exec_form(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// The restorable part of an image's `Config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageConfig {
    pub cmd: Option<Vec<String>>,
    pub entrypoint: Option<Vec<String>>,
    pub env: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

impl ImageConfig {
    /// Read the config of the first image in `descriptor`.
    ///
    /// Accepts the array printed by `docker inspect` or a single descriptor
    /// object. Missing and `null` fields are left unset.
    pub fn from_descriptor(descriptor: &Value) -> Self {
        let Some(config) =
            path::get(descriptor, "0/Config").or_else(|| path::get(descriptor, "Config"))
        else {
            return Self::default();
        };

        let labels = match path::get(config, LABELS) {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), scalar(v)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            cmd: string_list(config, CMD),
            entrypoint: string_list(config, ENTRYPOINT),
            env: string_list(config, ENV).unwrap_or_default(),
            labels,
        }
    }

    /// Parse the JSON printed by `docker inspect`.
    pub fn from_json(text: &str) -> Result<Self> {
        let descriptor: Value = serde_json::from_str(text)?;
        Ok(Self::from_descriptor(&descriptor))
    }

    /// Load a descriptor saved with `docker inspect <image> > file`.
    pub fn from_file(file: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(file)?)
    }

    pub fn is_empty(&self) -> bool {
        self.cmd.is_none()
            && self.entrypoint.is_none()
            && self.env.is_empty()
            && self.labels.is_empty()
    }

    /// Dockerfile instructions restoring this config.
    pub fn instructions(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(entrypoint) = &self.entrypoint {
            lines.push(format!("ENTRYPOINT {}", exec_form(entrypoint)));
        }
        if let Some(cmd) = &self.cmd {
            lines.push(format!("CMD {}", exec_form(cmd)));
        }
        for entry in &self.env {
            let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
            lines.push(format!("ENV {key}={}", quote(value)));
        }
        for (key, value) in &self.labels {
            lines.push(format!("LABEL {}={}", quote(key), quote(value)));
        }
        lines
    }
}

fn string_list(config: &Value, key: &str) -> Option<Vec<String>> {
    match path::get(config, key)? {
        Value::Array(items) => Some(items.iter().map(scalar).collect()),
        Value::Null => None,
        other => Some(vec![scalar(other)]),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
