//! Record-by-record editing over a working copy of the dataset.

use crate::core::schema::{ColumnConfig, DataType};
use crate::core::value::{FieldValue, Record};
use crate::error::{EditError, FieldError};
use regex::Regex;
use std::sync::OnceLock;

const URL_PATTERN: &str = r#"^(http|https)://[^ "]+$"#;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("url pattern is valid"))
}

pub fn is_valid_url(value: &str) -> bool {
    url_regex().is_match(value)
}

/// Converts raw input for a column into the value stored in the record.
pub fn coerce(column: &ColumnConfig, raw: &str) -> Result<FieldValue, EditError> {
    match column.data_type {
        DataType::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(FieldValue::Empty);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(|| EditError::NotANumber(raw.to_string()))
        }
        DataType::Select => {
            if raw.is_empty() {
                return Ok(FieldValue::Empty);
            }
            if column.options.iter().any(|o| o == raw) {
                Ok(FieldValue::text(raw))
            } else {
                Err(EditError::UnknownOption {
                    column: column.display_name.clone(),
                    value: raw.to_string(),
                })
            }
        }
        DataType::Text | DataType::Date | DataType::Url => Ok(FieldValue::text(raw)),
    }
}

#[derive(Debug, Clone)]
pub struct RecordEditor {
    working: Vec<Record>,
    columns: Vec<ColumnConfig>,
    current: usize,
    error: Option<FieldError>,
}

impl RecordEditor {
    pub fn new(data: Vec<Record>, columns: Vec<ColumnConfig>) -> Self {
        Self {
            working: data,
            columns,
            current: 0,
            error: None,
        }
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.working
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_record(&self) -> Option<&Record> {
        self.working.get(self.current)
    }

    /// The validation failure currently on display, if any.
    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn go_next(&mut self) -> bool {
        if self.current + 1 < self.working.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn go_previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn column(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.original_header == key)
    }

    /// The designated image column, if the schema has one.
    pub fn image_column(&self) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.is_image())
    }

    pub fn value(&self, record_index: usize, key: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.working
            .get(record_index)
            .and_then(|record| record.get(key))
            .unwrap_or(&EMPTY)
    }

    /// Image reference of the current record, or an empty string.
    pub fn current_image_url(&self) -> String {
        self.image_column()
            .map(|column| self.value(self.current, &column.original_header).to_display())
            .unwrap_or_default()
    }

    /// Writes a field on the working copy. Read-only columns and values the
    /// column type cannot hold are refused without touching any state.
    pub fn set_field(
        &mut self,
        record_index: usize,
        column_key: &str,
        raw: &str,
    ) -> Result<(), EditError> {
        let column = self
            .column(column_key)
            .ok_or_else(|| EditError::UnknownColumn(column_key.to_string()))?;
        if column.is_read_only() {
            return Err(EditError::ReadOnly(column.display_name.clone()));
        }
        let value = coerce(column, raw)?;
        let record = self
            .working
            .get_mut(record_index)
            .ok_or(EditError::NoSuchRecord(record_index))?;
        record.insert(column_key.to_string(), value);
        self.error = None;
        Ok(())
    }

    /// Checks every URL column of every record, in record then column order.
    pub fn validate_all(&self) -> Result<(), FieldError> {
        let url_columns: Vec<&ColumnConfig> =
            self.columns.iter().filter(|c| c.is_image()).collect();
        for (record_index, record) in self.working.iter().enumerate() {
            for column in &url_columns {
                let Some(value) = record.get(&column.original_header) else {
                    continue;
                };
                if value.is_empty() {
                    continue;
                }
                if !is_valid_url(&value.to_display()) {
                    return Err(FieldError {
                        record_index,
                        column_key: column.original_header.clone(),
                        display_name: column.display_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates and hands back the working copy for publication. On failure
    /// the cursor moves to the offending record and the error is kept for
    /// display.
    pub fn commit(&mut self) -> Result<Vec<Record>, FieldError> {
        match self.validate_all() {
            Ok(()) => {
                self.error = None;
                Ok(self.working.clone())
            }
            Err(err) => {
                self.current = err.record_index;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Permission;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample() -> RecordEditor {
        let data = vec![
            record(&[("name", "a".into()), ("img", "https://x.com/1.png".into())]),
            record(&[("name", "b".into()), ("img", FieldValue::Empty)]),
            record(&[("name", "c".into()), ("img", "not-a-url".into())]),
        ];
        let columns = vec![
            ColumnConfig::new("name"),
            ColumnConfig::new("img").with_type(DataType::Url),
        ];
        RecordEditor::new(data, columns)
    }

    #[test]
    fn navigation_is_clamped() {
        let mut editor = sample();
        assert!(!editor.go_previous());
        assert_eq!(editor.current_index(), 0);
        assert!(editor.go_next());
        assert!(editor.go_next());
        assert!(!editor.go_next());
        assert_eq!(editor.current_index(), 2);
    }

    #[test]
    fn validate_all_reports_first_bad_url() {
        let editor = sample();
        let err = editor.validate_all().expect_err("record 2 is invalid");
        assert_eq!(err.record_index, 2);
        assert_eq!(err.display_name, "img");
    }

    #[test]
    fn corrected_value_passes() {
        let mut editor = sample();
        editor
            .set_field(2, "img", "https://x.com/a.png")
            .expect("writable");
        assert!(editor.validate_all().is_ok());
    }

    #[test]
    fn failed_commit_moves_cursor_and_edit_clears_error() {
        let mut editor = sample();
        assert!(editor.commit().is_err());
        assert_eq!(editor.current_index(), 2);
        assert!(editor.error().is_some());
        editor.set_field(2, "name", "still bad url").expect("writable");
        assert!(editor.error().is_none());
        assert!(editor.validate_all().is_err());
    }

    #[test]
    fn readonly_write_is_refused() {
        let data = vec![record(&[("code", "A1".into())])];
        let columns = vec![ColumnConfig::new("code").with_permission(Permission::ReadOnly)];
        let mut editor = RecordEditor::new(data, columns);
        assert_eq!(
            editor.set_field(0, "code", "B2"),
            Err(EditError::ReadOnly("code".into()))
        );
        assert_eq!(editor.value(0, "code"), &FieldValue::text("A1"));
    }

    #[test]
    fn number_coercion_keeps_empty_distinct_from_zero() {
        let column = ColumnConfig::new("qty").with_type(DataType::Number);
        assert_eq!(coerce(&column, ""), Ok(FieldValue::Empty));
        assert_eq!(coerce(&column, "0"), Ok(FieldValue::Number(0.0)));
        assert_eq!(coerce(&column, " 12.5 "), Ok(FieldValue::Number(12.5)));
        assert!(matches!(coerce(&column, "abc"), Err(EditError::NotANumber(_))));
    }

    #[test]
    fn select_accepts_options_or_nothing() {
        let column = ColumnConfig::new("status")
            .with_type(DataType::Select)
            .with_options(["open", "closed"]);
        assert_eq!(coerce(&column, ""), Ok(FieldValue::Empty));
        assert_eq!(coerce(&column, "open"), Ok(FieldValue::text("open")));
        assert!(coerce(&column, "pending").is_err());
    }

    #[test]
    fn out_of_set_select_value_stays_readable() {
        let data = vec![record(&[("status", "legacy".into())])];
        let columns = vec![
            ColumnConfig::new("status")
                .with_type(DataType::Select)
                .with_options(["open"]),
        ];
        let editor = RecordEditor::new(data, columns);
        assert_eq!(editor.value(0, "status").to_display(), "legacy");
    }

    #[test]
    fn writes_to_added_columns_create_the_key() {
        let mut editor = sample();
        editor.columns.push(ColumnConfig::new("custom_col_1"));
        editor.set_field(1, "custom_col_1", "note").expect("writable");
        assert_eq!(editor.value(1, "custom_col_1"), &FieldValue::text("note"));
        assert_eq!(editor.value(0, "custom_col_1"), &FieldValue::Empty);
    }

    #[test]
    fn image_url_follows_cursor() {
        let mut editor = sample();
        assert_eq!(editor.current_image_url(), "https://x.com/1.png");
        editor.go_next();
        assert_eq!(editor.current_image_url(), "");
    }
}
