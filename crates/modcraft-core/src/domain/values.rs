//! Generation values: a recursive, string-keyed value tree.
//!
//! Templates read from it, modules inspect it, and the config editor merges
//! module defaults into persisted documents with it. A single deep-merge
//! operation, [`merge_missing`], serves both the override path and the
//! defaults path: the receiving tree always wins on leaves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Sorted map so rendering and serialisation are deterministic.
pub type ValueMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(m) => {
                f.write_str("map[")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<ValueMap> for Value {
    fn from(m: ValueMap) -> Self {
        Self::Map(m)
    }
}

/// Deep-merge `defaults` into `dst`, only filling keys `dst` lacks.
///
/// Where both sides hold a map the merge recurses; any other existing value
/// is kept as is.
pub fn merge_missing(dst: &mut ValueMap, defaults: &ValueMap) {
    for (key, default) in defaults {
        match dst.get_mut(key) {
            Some(Value::Map(existing)) => {
                if let Value::Map(nested) = default {
                    merge_missing(existing, nested);
                }
            }
            Some(_) => {}
            None => {
                dst.insert(key.clone(), default.clone());
            }
        }
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, DomainError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(DomainError::InvalidValuePath {
            path: path.to_string(),
            reason: "segments must be non-empty".into(),
        });
    }
    Ok(segments)
}

/// Set `value` at a dotted `path`, creating missing intermediate maps.
///
/// A non-map value sitting on an intermediate segment is replaced by a map.
/// Only the leaf is overwritten.
pub fn set_path(map: &mut ValueMap, path: &str, value: Value) -> Result<(), DomainError> {
    let segments = split_path(path)?;
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| DomainError::InvalidValuePath {
            path: path.to_string(),
            reason: "path is empty".into(),
        })?;

    let mut current = map;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Map(ValueMap::new()));
        if !slot.is_map() {
            *slot = Value::Map(ValueMap::new());
        }
        current = match slot {
            Value::Map(next) => next,
            _ => unreachable!("slot was just made a map"),
        };
    }
    current.insert((*leaf).to_string(), value);
    Ok(())
}

/// Look up a dotted path. Malformed paths simply miss.
pub fn get_path<'a>(map: &'a ValueMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = map.get(first)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

pub fn get_str<'a>(map: &'a ValueMap, path: &str) -> Option<&'a str> {
    get_path(map, path).and_then(Value::as_str)
}

/// Split a `key.sub=value` override into its path and value.
///
/// The value is always a string leaf, taken verbatim after trimming.
pub fn parse_override(raw: &str) -> Result<(String, Value), DomainError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| DomainError::InvalidValuePath {
            path: raw.to_string(),
            reason: "expected key=value".into(),
        })?;
    let key = key.trim();
    split_path(key)?;
    Ok((key.to_string(), Value::from(value.trim())))
}

/// Build generation values from `base` plus dotted-path overrides.
///
/// Overrides are applied in order onto an empty tree, then `base` is merged
/// in underneath them, so an override always wins over a base value at the
/// same leaf.
pub fn with_overrides<I, S>(base: &ValueMap, overrides: I) -> Result<ValueMap, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = ValueMap::new();
    for raw in overrides {
        let (key, value) = parse_override(raw.as_ref())?;
        set_path(&mut values, &key, value)?;
    }
    merge_missing(&mut values, base);
    Ok(values)
}
