//! Value and record representations produced by the generator.
//!
//! A `Record` is one row of one day. Its fields keep the column order of the
//! configuration so that every output format sees the same ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single generated cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// String value
    String(String),

    /// Null value
    Null,
}

impl FieldValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Check if this value is a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Check if this value is a numeric zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used when a transition coerces a number, tagged with `prefix`
    /// so it never reads back as a number.
    ///
    /// Strings are returned unchanged and null stays null.
    pub fn into_string_value(self, prefix: &str) -> FieldValue {
        match self {
            Self::Int(i) => Self::String(format!("{prefix}{i}")),
            Self::Float(f) => Self::String(format!("{prefix}{f}")),
            other => other,
        }
    }
}

/// Display form used by text outputs: null renders as an empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

/// One generated row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Day the row belongs to
    pub day: u32,

    /// Row index across the whole run
    pub index: u64,

    /// Field values in column order (key -> value)
    pub fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create a new record.
    pub fn new(day: u32, index: u64, fields: Vec<(String, FieldValue)>) -> Self {
        Self { day, index, fields }
    }

    /// Create a new record with a builder pattern.
    pub fn builder(day: u32, index: u64) -> RecordBuilder {
        RecordBuilder {
            day,
            index,
            fields: Vec::new(),
        }
    }

    /// Get a field value by key.
    pub fn get_field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Field keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Get the number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Convert to a JSON object, preserving field order.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), field_value_to_json(v)))
            .collect();
        serde_json::Value::Object(map)
    }
}

fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Int(i) => serde_json::Value::from(*i),
        // Non-finite floats have no JSON form; the generator never emits them.
        FieldValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        FieldValue::String(s) => serde_json::Value::String(s.clone()),
        FieldValue::Null => serde_json::Value::Null,
    }
}

/// Builder for `Record`.
pub struct RecordBuilder {
    day: u32,
    index: u64,
    fields: Vec<(String, FieldValue)>,
}

impl RecordBuilder {
    /// Add a field to the record.
    pub fn field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((key.into(), value));
        self
    }

    /// Add a field through a mutable reference.
    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.push((key.into(), value));
    }

    /// Build the record.
    pub fn build(self) -> Record {
        Record {
            day: self.day,
            index: self.index,
            fields: self.fields,
        }
    }
}
