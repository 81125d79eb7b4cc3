//! Common test helpers shared across the integration test suite.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use wosfile::RawRecord;

/// Path of a fixture under `tests/data`.
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Write `contents` to a fresh temporary file.
///
/// The file is deleted when the returned handle is dropped.
pub fn temp_export(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Build a raw record from `(tag, value)` pairs.
pub fn raw(pairs: &[(&str, &str)]) -> RawRecord {
    pairs
        .iter()
        .map(|(tag, value)| ((*tag).to_string(), (*value).to_string()))
        .collect()
}

/// Wrap plain text record bodies in the `FN`/`VR` preamble and `EF` marker.
pub fn plain_export(records: &[&str]) -> String {
    let mut text = String::from("FN Clarivate Analytics Web of Science\nVR 1.0\n");
    for record in records {
        text.push_str(record);
        if !record.ends_with('\n') {
            text.push('\n');
        }
        text.push_str("ER\n\n");
    }
    text.push_str("EF\n");
    text
}

/// Encode `text` as UTF-16LE with byte-order mark.
pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
