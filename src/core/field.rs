//! Typed name/value fields
//!
//! A [`Field`] owns both its name and any string payload, so a field can be
//! handed to any sink without lifetime bookkeeping. Sinks only read fields for
//! the duration of a `write` call; a [`ContextSink`](crate::sinks::ContextSink)
//! keeps its own clones.

use super::error::{Result, SinkError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Calendar layout used for time values: `2025-04-13T01:40:00`
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Kind tag of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Bool,
    Int,
    String,
    Time,
}

impl FieldKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::String => "string",
            FieldKind::Time => "time",
        }
    }

    /// Whether values of this kind are rendered inside double quotes
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        matches!(self, FieldKind::String)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Value carried by a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    String(String),
    Time(NaiveDateTime),
}

impl FieldValue {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Time(_) => FieldKind::Time,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Time(t) => serde_json::Value::String(t.format(TIME_FORMAT).to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(t: NaiveDateTime) -> Self {
        FieldValue::Time(t)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Time(t.naive_utc())
    }
}

/// A single named, typed value to be logged
///
/// The name is validated once at construction and cannot change afterwards.
///
/// # Example
///
/// ```
/// use rust_field_sink::{Field, FieldKind};
///
/// let field = Field::new("user", "alice").unwrap();
/// assert_eq!(field.name(), "user");
/// assert_eq!(field.kind(), FieldKind::String);
/// assert_eq!(field.to_string(), "user=\"alice\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    /// Create a field, rejecting an empty name
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SinkError::invalid_field("field name must not be empty"));
        }
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// Split the field into its name and value
    pub fn into_parts(self) -> (String, FieldValue) {
        (self.name, self.value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::line_format::render_field(self))
    }
}

/// Create a boolean field
pub fn bool_field(name: impl Into<String>, value: bool) -> Result<Field> {
    Field::new(name, FieldValue::Bool(value))
}

/// Create an integer field
pub fn int_field(name: impl Into<String>, value: i64) -> Result<Field> {
    Field::new(name, FieldValue::Int(value))
}

/// Create a string field; the text is copied into the field
pub fn string_field(name: impl Into<String>, value: impl Into<String>) -> Result<Field> {
    Field::new(name, FieldValue::String(value.into()))
}

/// Create a time field
pub fn time_field(name: impl Into<String>, value: NaiveDateTime) -> Result<Field> {
    Field::new(name, FieldValue::Time(value))
}
