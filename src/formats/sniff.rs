//! Export format detection.

use crate::encoding::TextEncoding;
use crate::error::{Result, WosError};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

/// Number of decoded characters inspected when detecting the format.
const FORMAT_SNIFF_CHARS: usize = 10;

/// Number of raw bytes read to obtain [`FORMAT_SNIFF_CHARS`] characters,
/// enough for UTF-16 with a BOM.
const FORMAT_SNIFF_BYTES: usize = 64;

/// Marker that opens every plain text export.
const PLAIN_TEXT_MARKER: &str = "FN ";

/// The two serializations offered by the WoS export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Multi-line tagged records terminated by `ER`, file terminated by `EF`
    PlainText,
    /// One header row of tags followed by one row per record
    TabDelimited,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::PlainText => f.write_str("plain text"),
            ExportFormat::TabDelimited => f.write_str("tab-delimited"),
        }
    }
}

/// Decide the export format from the first decoded characters of a file.
///
/// # Errors
///
/// Returns [`WosError::Format`] when the prefix matches neither format,
/// which includes empty input.
pub fn detect_format(prefix: &str) -> Result<ExportFormat> {
    let sniff: String = prefix.chars().take(FORMAT_SNIFF_CHARS).collect();

    if sniff.starts_with(PLAIN_TEXT_MARKER) {
        Ok(ExportFormat::PlainText)
    } else if sniff.contains('\t') {
        Ok(ExportFormat::TabDelimited)
    } else {
        Err(WosError::format(
            1,
            format!("could not determine export format from {sniff:?}"),
        ))
    }
}

/// Detect the export format of a seekable byte stream in `encoding`.
///
/// The stream is returned to the position it had on entry whether or not
/// detection succeeds.
///
/// # Errors
///
/// Returns an I/O error if the stream cannot be read or rewound, or
/// [`WosError::Format`] if the format cannot be determined.
pub fn sniff_format<R: Read + Seek>(reader: &mut R, encoding: TextEncoding) -> Result<ExportFormat> {
    let start = reader.stream_position()?;
    let mut prefix = Vec::with_capacity(FORMAT_SNIFF_BYTES);
    let read = reader
        .by_ref()
        .take(FORMAT_SNIFF_BYTES as u64)
        .read_to_end(&mut prefix);
    reader.seek(SeekFrom::Start(start))?;
    read?;

    detect_format(&encoding.decode_prefix(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_detect_plain_text() {
        let format = detect_format("FN Thomson Reuters Web of Science\nVR 1.0\n").unwrap();
        assert_eq!(format, ExportFormat::PlainText);
    }

    #[test]
    fn test_detect_tab_delimited() {
        assert_eq!(detect_format("PT\tAU\tBA").unwrap(), ExportFormat::TabDelimited);
    }

    #[test]
    fn test_tab_beyond_prefix_is_ignored() {
        assert!(detect_format("ABCDEFGHIJKL\tM").is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = detect_format("").unwrap_err();
        assert!(matches!(err, WosError::Format { .. }));
    }

    #[test]
    fn test_fn_without_space_is_not_plain_text() {
        assert!(detect_format("FNxyz").is_err());
    }

    #[test]
    fn test_sniff_rewinds_on_success_and_failure() {
        let mut cursor = Cursor::new(b"PT\tAU\nJ\tx\n".to_vec());
        assert_eq!(
            sniff_format(&mut cursor, TextEncoding::Utf8).unwrap(),
            ExportFormat::TabDelimited
        );
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new(b"nothing here".to_vec());
        assert!(sniff_format(&mut cursor, TextEncoding::Utf8).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_sniff_utf16_plain_text() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "FN Clarivate\nVR 1.0\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut cursor = Cursor::new(bytes);
        assert_eq!(
            sniff_format(&mut cursor, TextEncoding::Utf16).unwrap(),
            ExportFormat::PlainText
        );
    }
}
