use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the imported dataset. Key order is column order.
pub type Record = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(v) => v.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Text used for display and for editing buffers.
    pub fn to_display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(v) => f.write_str(v),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Column keys of a dataset, taken from the first record in insertion order.
pub fn column_keys(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Record, column_keys};

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(FieldValue::Number(42.0).to_string(), "42");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }

    #[test]
    fn blank_text_counts_as_empty() {
        assert!(FieldValue::text("   ").is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn column_keys_follow_first_record_order() {
        let mut first = Record::new();
        first.insert("name".into(), "Widget".into());
        first.insert("photo".into(), FieldValue::Empty);
        first.insert("qty".into(), 3i64.into());
        assert_eq!(column_keys(&[first]), vec!["name", "photo", "qty"]);
        assert!(column_keys(&[]).is_empty());
    }

    #[test]
    fn serializes_untagged() {
        let mut record = Record::new();
        record.insert("a".into(), "x".into());
        record.insert("b".into(), 1.5.into());
        record.insert("c".into(), FieldValue::Empty);
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"a":"x","b":1.5,"c":null}"#);
    }
}
