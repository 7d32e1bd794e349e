//! Line formats for rendered field sets
//!
//! Provides the layouts a terminal sink can render one `write` call into:
//! - Text: `name="value", other=42` (default)
//! - Json: one JSON object per line, keys in field order

use super::error::Result;
use super::field::{Field, FieldValue};

/// Separator placed between rendered fields in text lines
pub const FIELD_SEPARATOR: &str = ", ";

/// Output layout for one rendered line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineFormat {
    /// Comma separated `name=value` pairs (default)
    ///
    /// Example: `foo="bar", count=2, at=2025-04-13T01:40:00`
    #[default]
    Text,

    /// JSON object per line
    ///
    /// Example: `{"foo":"bar","count":2,"at":"2025-04-13T01:40:00"}`
    ///
    /// A name that appears more than once keeps its first position and its last value.
    Json,
}

impl LineFormat {
    /// Render a full line, including the trailing newline
    pub fn render(&self, fields: &[Field]) -> Result<String> {
        let mut line = match self {
            LineFormat::Text => render_text(fields),
            LineFormat::Json => render_json(fields)?,
        };
        line.push('\n');
        Ok(line)
    }
}

/// Render fields as text without the line terminator
#[must_use]
pub fn render_text(fields: &[Field]) -> String {
    fields
        .iter()
        .map(render_field)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Render a single field as `name=value`, quoting kinds that ask for it
#[must_use]
pub fn render_field(field: &Field) -> String {
    let name = escape(field.name());
    let value = match field.value() {
        FieldValue::String(s) => escape(s),
        other => other.to_string(),
    };
    if field.kind().is_quoted() {
        format!("{}=\"{}\"", name, value)
    } else {
        format!("{}={}", name, value)
    }
}

fn render_json(fields: &[Field]) -> Result<String> {
    let mut json_obj = serde_json::Map::new();
    for field in fields {
        json_obj.insert(field.name().to_string(), field.value().to_json_value());
    }
    Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
}

/// Escape text so a rendered field can never break out of its line or quotes
fn escape(text: &str) -> String {
    if !text.contains(['\\', '"', '\n', '\r', '\t']) {
        return text.to_string();
    }
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
