use super::{RecordBuilder, unique_headers};
use crate::core::value::{FieldValue, Record};
use crate::error::DecodeError;
use calamine::{Data, Reader, Sheets, open_workbook_auto};
use std::path::Path;

/// Reads the first worksheet. The first non-blank row is the header row.
pub fn decode(path: &Path) -> Result<Vec<Record>, DecodeError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| DecodeError::Spreadsheet(format!("failed to open workbook: {e}")))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(DecodeError::Empty);
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DecodeError::Spreadsheet(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|cell| cell_value(cell).is_empty()));
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers = unique_headers(header_row.iter().map(|cell| cell_value(cell).to_display()));
    let builder = RecordBuilder::new(headers);

    let records: Vec<Record> = rows
        .filter_map(|row| builder.row(row.iter().map(cell_value)))
        .collect();
    tracing::debug!(sheet = %sheet_name, records = records.len(), "worksheet read");
    Ok(records)
}

fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::Empty,
        Data::String(s) if s.is_empty() => FieldValue::Empty,
        Data::String(s) => FieldValue::text(s.as_str()),
        Data::Float(n) => FieldValue::Number(*n),
        Data::Int(n) => FieldValue::Number(*n as f64),
        Data::Bool(b) => FieldValue::text(if *b { "true" } else { "false" }),
        // Serial day number, as the spreadsheet stores it.
        Data::DateTime(dt) => FieldValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => FieldValue::text(s.as_str()),
        Data::Error(e) => FieldValue::text(format!("#{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_map_to_field_values() {
        assert_eq!(cell_value(&Data::Empty), FieldValue::Empty);
        assert_eq!(cell_value(&Data::String(String::new())), FieldValue::Empty);
        assert_eq!(cell_value(&Data::Int(7)), FieldValue::Number(7.0));
        assert_eq!(cell_value(&Data::Float(2.5)), FieldValue::Number(2.5));
        assert_eq!(cell_value(&Data::Bool(true)), FieldValue::text("true"));
        assert_eq!(
            cell_value(&Data::String("Widget".into())),
            FieldValue::text("Widget")
        );
    }

    #[test]
    fn missing_workbook_is_a_spreadsheet_error() {
        let err = decode(Path::new("/nonexistent/rowdeck-test.xlsx")).expect_err("missing");
        assert!(matches!(err, DecodeError::Spreadsheet(_)));
    }
}
