use super::RecordBuilder;
use crate::core::value::{FieldValue, Record};
use crate::error::DecodeError;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::path::Path;

type JsonObject = IndexMap<String, Value>;

/// Reads an array of flat objects. Keys are collected in order of first
/// appearance across all objects.
pub fn decode(path: &Path) -> Result<Vec<Record>, DecodeError> {
    let content = std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_str(&content)
}

pub fn decode_str(content: &str) -> Result<Vec<Record>, DecodeError> {
    let objects: Vec<JsonObject> = serde_json::from_str(content)?;

    let mut headers: IndexSet<String> = IndexSet::new();
    for object in &objects {
        headers.extend(object.keys().cloned());
    }
    let headers: Vec<String> = headers.into_iter().collect();
    let builder = RecordBuilder::new(headers.clone());

    let mut records = Vec::with_capacity(objects.len());
    for (index, mut object) in objects.into_iter().enumerate() {
        let mut cells = Vec::with_capacity(headers.len());
        for header in &headers {
            let value = object.shift_remove(header).unwrap_or(Value::Null);
            cells.push(field_value(value).ok_or(DecodeError::NotFlat { index })?);
        }
        if let Some(record) = builder.row(cells) {
            records.push(record);
        }
    }
    Ok(records)
}

fn field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Empty),
        Value::String(s) if s.is_empty() => Some(FieldValue::Empty),
        Value::String(s) => Some(FieldValue::Text(s)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::Bool(b) => Some(FieldValue::text(b.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
