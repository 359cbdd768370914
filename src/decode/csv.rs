use super::{RecordBuilder, unique_headers};
use crate::core::value::{FieldValue, Record};
use crate::error::DecodeError;
use std::path::Path;

/// Reads a delimited text file. Every cell is text; blank cells are empty.
pub fn decode(path: &Path, tab: bool) -> Result<Vec<Record>, DecodeError> {
    let content = read_as_utf8(path)?;
    let delimiter = if tab { b'\t' } else { sniff_delimiter(&content) };
    decode_str(&content, delimiter)
}

pub fn decode_str(content: &str, delimiter: u8) -> Result<Vec<Record>, DecodeError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();
    let header_row = loop {
        match rows.next() {
            Some(row) => {
                let row = row?;
                if row.iter().any(|cell| !cell.trim().is_empty()) {
                    break row;
                }
            }
            None => return Ok(Vec::new()),
        }
    };
    let builder = RecordBuilder::new(unique_headers(header_row.iter()));

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        if let Some(record) = builder.row(row.iter().map(cell_value)) {
            records.push(record);
        }
    }
    Ok(records)
}

fn cell_value(cell: &str) -> FieldValue {
    if cell.is_empty() {
        FieldValue::Empty
    } else {
        FieldValue::text(cell)
    }
}

/// Picks the delimiter that gives the most consistent field count (more than
/// one field) over the first lines. Defaults to a comma.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                ::csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts.first().copied().unwrap_or(0);
        if target <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Reads the file as UTF-8, falling back to Windows-1252 for legacy exports.
fn read_as_utf8(path: &Path) -> Result<String, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
