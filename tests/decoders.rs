// File decoding through the public entry point, one fixture per format.

use rowdeck::core::FieldValue;
use rowdeck::decode::{BLANK_HEADER, SourceFormat, decode_file};
use rowdeck::error::DecodeError;
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn csv_keeps_header_order_and_pads_short_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "items.csv", b"\n\nsku,name,,qty\nA1,Widget\n,,,\nB2,Gadget,x,3\n");

    let records = decode_file(&path).expect("decode");
    assert_eq!(records.len(), 2);
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["sku", "name", BLANK_HEADER, "qty"]);
    assert_eq!(records[0].get("qty"), Some(&FieldValue::Empty));
    // Delimited values are never reinterpreted as numbers.
    assert_eq!(records[1].get("qty"), Some(&FieldValue::text("3")));
}

#[test]
fn semicolon_and_tab_files_are_recognised() {
    let dir = tempfile::tempdir().expect("tempdir");
    let semi = write(dir.path(), "export.csv", b"a;b\n1;2\n");
    let tsv = write(dir.path(), "export.tsv", b"a\tb\n1\t2\n");

    for path in [semi, tsv] {
        let records = decode_file(&path).expect("decode");
        assert_eq!(records[0].get("b"), Some(&FieldValue::text("2")));
    }
}

#[test]
fn legacy_encoded_csv_is_decoded() {
    let dir = tempfile::tempdir().expect("tempdir");
    // "café" in Windows-1252.
    let path = write(dir.path(), "legacy.csv", b"name\ncaf\xe9\n");
    let records = decode_file(&path).expect("decode");
    assert_eq!(records[0].get("name"), Some(&FieldValue::text("café")));
}

#[test]
fn json_array_of_objects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "items.json",
        br#"[{"name":"Widget","price":9.5},{"name":"Gadget","active":true}]"#,
    );

    let records = decode_file(&path).expect("decode");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("price"), Some(&FieldValue::Number(9.5)));
    assert_eq!(records[0].get("active"), Some(&FieldValue::Empty));
    assert_eq!(records[1].get("price"), Some(&FieldValue::Empty));
}

#[test]
fn empty_inputs_are_reported_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write(dir.path(), "blank.csv", b"name,qty\n");
    let json = write(dir.path(), "blank.json", b"[]");

    assert!(matches!(decode_file(&csv), Err(DecodeError::Empty)));
    assert!(matches!(decode_file(&json), Err(DecodeError::Empty)));
}

#[test]
fn unsupported_and_missing_files_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pdf = write(dir.path(), "report.pdf", b"%PDF");
    assert!(matches!(
        decode_file(&pdf),
        Err(DecodeError::UnsupportedFormat(ext)) if ext == "pdf"
    ));
    assert!(matches!(
        decode_file(&dir.path().join("missing.csv")),
        Err(DecodeError::Io { .. })
    ));
    assert!(matches!(
        SourceFormat::from_path(Path::new("Book.XLSX")),
        Ok(SourceFormat::Spreadsheet)
    ));
}

#[test]
fn corrupt_spreadsheet_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "broken.xlsx", b"definitely not a zip archive");
    assert!(matches!(decode_file(&path), Err(DecodeError::Spreadsheet(_))));
}
