//! Sample values
//!
//! A sample is one parsed log record: an ordered map from field name to
//! [`Value`]. Values mirror JSON, except that whole numbers and floating
//! point numbers are kept apart so numeric promotion can be decided later.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::{InferenceError, InferenceResult};

/// A single parsed record, field order preserved
pub type Sample = IndexMap<String, Value>;

/// Raw field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Whole number that fits an i64
    Integer(i64),
    /// Any other number
    Float(f64),
    /// String value
    String(String),
    /// Array of values, possibly nested
    Array(Vec<Value>),
    /// Nested record
    Object(Sample),
}

impl Value {
    /// Get the type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual rendering of a scalar value
    ///
    /// Returns `None` for null, arrays and objects.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Integer(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(n) => Some(Cow::Owned(n.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Flatten arrays into their elements, dropping nulls
///
/// Nested arrays are flattened recursively and element order is kept, so
/// `[42, [1, -99]]` yields `42, 1, -99`.
pub fn flatten_values<'a, I>(values: I) -> Vec<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut flattened = Vec::new();
    for value in values {
        push_flattened(value, &mut flattened);
    }
    flattened
}

fn push_flattened<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                push_flattened(item, out);
            }
        }
        other => out.push(other),
    }
}

/// Parse one JSON object into a sample
pub fn sample_from_json(json: &str) -> InferenceResult<Sample> {
    // Deserializing straight into `Value` keeps the document's field order
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Object(sample) => Ok(sample),
        other => Err(InferenceError::InvalidStructure(
            other.type_name().to_string(),
        )),
    }
}

/// Parse newline-delimited JSON objects into samples
///
/// Blank lines are skipped.
pub fn samples_from_json_lines(text: &str) -> InferenceResult<Vec<Sample>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(sample_from_json)
        .collect()
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Sample> for Value {
    fn from(sample: Sample) -> Self {
        Value::Object(sample)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
