//! Slash-delimited path access into nested JSON maps.
//!
//! `Config/Labels/maintainer` walks object keys one segment at a time.
//! Numeric segments also index into arrays, so the array printed by
//! `docker inspect` can be addressed as `0/Config/Cmd`.
//!
//! Reads never fail: a missing segment anywhere yields `None`. An explicit
//! JSON `null` is a present value and is returned as `Some(Value::Null)`.

use serde_json::{Map, Value};

use crate::error::{DfxError, Result};

/// Look up `path` in `descriptor`.
pub fn get<'a>(descriptor: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/').try_fold(descriptor, |element, segment| match element {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// True iff [`get`] finds something at `path`.
pub fn exists(descriptor: &Value, path: &str) -> bool {
    get(descriptor, path).is_some()
}

/// Mutable path access over a borrowed descriptor.
pub struct PathAccess<'a> {
    descriptor: &'a mut Value,
}

impl<'a> PathAccess<'a> {
    pub fn new(descriptor: &'a mut Value) -> Self {
        Self { descriptor }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        get(&*self.descriptor, path)
    }

    pub fn exists(&self, path: &str) -> bool {
        exists(&*self.descriptor, path)
    }

    /// Write `value` at `path`, overwriting whatever the last segment held.
    ///
    /// Missing intermediate maps are created when `create` is set; otherwise
    /// the first missing one is a [`DfxError::MissingPath`]. Numeric
    /// segments address existing array elements as they do for [`get`];
    /// array elements are never created.
    pub fn set(&mut self, path: &str, value: Value, create: bool) -> Result<()> {
        let segments: Vec<&str> = path.split('/').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut element = &mut *self.descriptor;
        let mut parent = "";
        for segment in parents {
            element = match element {
                Value::Object(map) => {
                    if !map.contains_key(*segment) {
                        if !create {
                            return Err(missing(segment, path));
                        }
                        map.insert(segment.to_string(), Value::Object(Map::new()));
                    }
                    map.get_mut(*segment).ok_or_else(|| missing(segment, path))?
                }
                Value::Array(items) => {
                    element_at(items, segment).ok_or_else(|| missing(segment, path))?
                }
                _ => return Err(not_a_map(parent, path)),
            };
            parent = *segment;
        }

        match element {
            Value::Object(map) => {
                map.insert(last.to_string(), value);
            }
            Value::Array(items) => {
                *element_at(items, last).ok_or_else(|| missing(last, path))? = value;
            }
            _ => return Err(not_a_map(parent, path)),
        }
        Ok(())
    }
}

fn element_at<'v>(items: &'v mut [Value], segment: &str) -> Option<&'v mut Value> {
    segment.parse::<usize>().ok().and_then(|i| items.get_mut(i))
}

fn missing(segment: &str, path: &str) -> DfxError {
    DfxError::MissingPath {
        segment: segment.to_string(),
        path: path.to_string(),
    }
}

fn not_a_map(segment: &str, path: &str) -> DfxError {
    DfxError::NotAMap {
        segment: segment.to_string(),
        path: path.to_string(),
    }
}
