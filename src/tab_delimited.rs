//! Reading WoS "tab-delimited" exports.
//!
//! The first line holds the field tags, every further line one record:
//!
//! ```text
//! PT<TAB>AU<TAB>C1
//! J<TAB>Doe, J; Foo, B<TAB>[Doe, J] Univ X<TAB>
//! ```
//!
//! WoS writes one spurious delimiter at the end of every data line, which
//! shows up as a cell without a header. Such cells are dropped.
//!
//! Cells are never quoted, so a `"` in a cell is kept as text.

use crate::error::{Result, WosError};
use crate::formats::FormatReader;
use crate::record::RawRecord;
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::io::{self, Read};

/// Reader for WoS tab-delimited exports.
///
/// # Examples
///
/// ```
/// use wosfile::TabDelimitedReader;
///
/// let data = "PT\tAU\tC1\nJ\ta\tb\t";
/// let mut reader = TabDelimitedReader::new(data.as_bytes())?;
///
/// let record = reader.read_record()?.unwrap();
/// assert_eq!(record.len(), 3);
/// assert_eq!(record["C1"], "b");
/// # Ok::<(), wosfile::WosError>(())
/// ```
#[derive(Debug)]
pub struct TabDelimitedReader<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    row: StringRecord,
    records_read: usize,
    done: bool,
}

impl<R: Read> TabDelimitedReader<R> {
    /// Create a reader and consume the header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the header line cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(convert_error)?
            .iter()
            .map(String::from)
            .collect();

        Ok(TabDelimitedReader {
            reader,
            headers,
            row: StringRecord::new(),
            records_read: 0,
            done: false,
        })
    }

    /// Field tags from the header line, in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read the next record.
    ///
    /// Columns missing from a short row are filled with the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::Delimited`] if a row cannot be parsed, or
    /// [`WosError::Encoding`] if the text cannot be decoded.
    pub fn read_record(&mut self) -> Result<Option<RawRecord>> {
        if self.done {
            return Ok(None);
        }

        match self.reader.read_record(&mut self.row) {
            Ok(true) => {
                self.records_read += 1;
                Ok(Some(self.current_record()))
            },
            Ok(false) => {
                self.done = true;
                Ok(None)
            },
            Err(e) => {
                self.done = true;
                Err(convert_error(e))
            },
        }
    }

    fn current_record(&self) -> RawRecord {
        let mut record = RawRecord::with_capacity(self.headers.len());
        for (index, tag) in self.headers.iter().enumerate() {
            if tag.is_empty() {
                continue;
            }
            let value = self.row.get(index).unwrap_or_default();
            record.insert(tag.clone(), value.to_string());
        }

        let dropped = self
            .row
            .iter()
            .skip(self.headers.len())
            .filter(|cell| !cell.is_empty())
            .count();
        if dropped > 0 {
            debug!(
                "record {}: dropping {dropped} non-empty cells beyond the header",
                self.records_read
            );
        }
        record
    }
}

impl<R: Read + std::fmt::Debug> FormatReader for TabDelimitedReader<R> {
    fn read_record(&mut self) -> Result<Option<RawRecord>> {
        TabDelimitedReader::read_record(self)
    }

    fn records_read(&self) -> Option<usize> {
        Some(self.records_read)
    }
}

/// Keep decoding failures recognizable as encoding errors.
fn convert_error(err: csv::Error) -> WosError {
    if let csv::ErrorKind::Io(io_err) = err.kind() {
        if io_err.kind() == io::ErrorKind::InvalidData {
            return WosError::Encoding(io_err.to_string());
        }
    }
    WosError::Delimited(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_one_record() {
        let mut r = TabDelimitedReader::new("PT\tAF\tC1\nJ\tAa; Bb\tX; Y".as_bytes()).unwrap();
        assert_eq!(
            r.read_record().unwrap(),
            Some(raw(&[("PT", "J"), ("AF", "Aa; Bb"), ("C1", "X; Y")]))
        );
        assert_eq!(r.read_record().unwrap(), None);
    }

    #[test]
    fn test_multiple_records() {
        let data = "PT\tAF\tC1\nJ\tAa; Bb\tX; Y\nJ\tBb; Cc\tY; Z";
        let mut r = TabDelimitedReader::new(data.as_bytes()).unwrap();
        let records = r.read_all().unwrap();
        assert_eq!(
            records,
            vec![
                raw(&[("PT", "J"), ("AF", "Aa; Bb"), ("C1", "X; Y")]),
                raw(&[("PT", "J"), ("AF", "Bb; Cc"), ("C1", "Y; Z")]),
            ]
        );
        assert_eq!(FormatReader::records_read(&r), Some(2));
    }

    #[test]
    fn test_spurious_tab_at_end() {
        let mut r = TabDelimitedReader::new("PT\tAU\tC1\nJ\ta\tb\t".as_bytes()).unwrap();
        let record = r.read_record().unwrap().unwrap();
        assert_eq!(record, raw(&[("PT", "J"), ("AU", "a"), ("C1", "b")]));
        assert!(!record.contains_key(""));
    }

    #[test]
    fn test_empty_header_column_is_dropped() {
        let mut r = TabDelimitedReader::new("PT\tAU\t\nJ\ta\t\n".as_bytes()).unwrap();
        assert_eq!(r.headers(), ["PT", "AU", ""]);
        assert_eq!(r.read_record().unwrap(), Some(raw(&[("PT", "J"), ("AU", "a")])));
    }

    #[test]
    fn test_short_row_is_padded() {
        let mut r = TabDelimitedReader::new("PT\tAU\tC1\nJ\ta\n".as_bytes()).unwrap();
        assert_eq!(
            r.read_record().unwrap(),
            Some(raw(&[("PT", "J"), ("AU", "a"), ("C1", "")]))
        );
    }

    #[test]
    fn test_crlf_rows() {
        let mut r = TabDelimitedReader::new("PT\tAU\r\nJ\ta\t\r\n".as_bytes()).unwrap();
        assert_eq!(r.read_record().unwrap(), Some(raw(&[("PT", "J"), ("AU", "a")])));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let mut r = TabDelimitedReader::new("PT\tAU\n\nJ\ta\t\n\r\nJ\tb\t\n".as_bytes()).unwrap();
        let records = r.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["AU"], "b");
    }

    #[test]
    fn test_quote_characters_are_text() {
        let data = "PT\tTI\tAB\nJ\t\"Quoted\" title\tsays \"hi\t\n";
        let mut r = TabDelimitedReader::new(data.as_bytes()).unwrap();
        let record = r.read_record().unwrap().unwrap();
        assert_eq!(record["TI"], "\"Quoted\" title");
        assert_eq!(record["AB"], "says \"hi");
    }

    #[test]
    fn test_header_only() {
        let mut r = TabDelimitedReader::new("PT\tAU\n".as_bytes()).unwrap();
        assert_eq!(r.read_record().unwrap(), None);
    }
}
