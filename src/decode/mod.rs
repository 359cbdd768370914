//! Turning a user-supplied file into an ordered list of records.
//!
//! Every decoder produces a homogeneous dataset: each record carries every
//! header key, in header order, with missing cells stored as
//! [`FieldValue::Empty`].

pub mod csv;
pub mod json;
pub mod xlsx;

use crate::core::value::{FieldValue, Record};
use crate::error::DecodeError;
use std::collections::HashMap;
use std::path::Path;

/// Placeholder for header cells that are blank.
pub const BLANK_HEADER: &str = "__EMPTY";

pub trait RowDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<Record>, DecodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Delimited { tab: bool },
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "csv" | "txt" => Ok(Self::Delimited { tab: false }),
            "tsv" => Ok(Self::Delimited { tab: true }),
            "json" => Ok(Self::Json),
            "" => Err(DecodeError::UnsupportedFormat("no extension".to_string())),
            other => Err(DecodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Dispatches on the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl RowDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<Record>, DecodeError> {
        tracing::debug!(path = %path.display(), "decoding");
        let records = match SourceFormat::from_path(path)? {
            SourceFormat::Spreadsheet => xlsx::decode(path)?,
            SourceFormat::Delimited { tab } => csv::decode(path, tab)?,
            SourceFormat::Json => json::decode(path)?,
        };
        if records.is_empty() {
            return Err(DecodeError::Empty);
        }
        tracing::debug!(path = %path.display(), records = records.len(), "decoded");
        Ok(records)
    }
}

pub fn decode_file(path: &Path) -> Result<Vec<Record>, DecodeError> {
    FileDecoder.decode(path)
}

/// Names header cells: blanks become `__EMPTY`, and repeats get a numeric
/// suffix (`name`, `name_1`, `name_2`).
pub fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for header in raw {
        let header = header.as_ref().trim();
        let base = if header.is_empty() {
            BLANK_HEADER.to_string()
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        if let Some(counter) = counts.get(&base).copied() {
            let mut counter = counter;
            loop {
                name = format!("{base}_{counter}");
                counter += 1;
                if !counts.contains_key(&name) {
                    break;
                }
            }
            counts.insert(base, counter);
        } else {
            counts.insert(base, 1);
        }
        counts.entry(name.clone()).or_insert(1);
        out.push(name);
    }
    out
}

/// Builds records against a fixed header list.
pub(crate) struct RecordBuilder {
    headers: Vec<String>,
}

impl RecordBuilder {
    pub(crate) fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    /// Returns `None` for rows whose cells are all empty.
    pub(crate) fn row<I>(&self, cells: I) -> Option<Record>
    where
        I: IntoIterator<Item = FieldValue>,
    {
        let mut cells = cells.into_iter();
        let record: Record = self
            .headers
            .iter()
            .map(|header| (header.clone(), cells.next().unwrap_or_default()))
            .collect();
        record.values().any(|v| !v.is_empty()).then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_duplicate_headers_are_named() {
        let headers = unique_headers(["name", "", "name", " ", "name", "name_1"]);
        assert_eq!(
            headers,
            vec!["name", "__EMPTY", "name_1", "__EMPTY_1", "name_2", "name_1_1"]
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/B.XLSX")).ok(),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("a.tsv")).ok(),
            Some(SourceFormat::Delimited { tab: true })
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("a.docx")),
            Err(DecodeError::UnsupportedFormat(ext)) if ext == "docx"
        ));
    }

    #[test]
    fn builder_pads_short_rows_and_skips_blank_ones() {
        let builder = RecordBuilder::new(vec!["a".into(), "b".into()]);
        let record = builder.row([FieldValue::text("x")]).expect("non-blank");
        assert_eq!(record["b"], FieldValue::Empty);
        assert!(builder.row([FieldValue::text(" "), FieldValue::Empty]).is_none());
    }
}
