//! The reader interface shared by plain text and tab-delimited exports.
//!
//! Both readers yield [`RawRecord`]s, so everything after format detection
//! can be written against `dyn FormatReader`.
//!
//! ```
//! use wosfile::formats::{FormatReader, FormatReaderExt};
//!
//! fn count_articles<R: FormatReader>(reader: &mut R) -> wosfile::Result<usize> {
//!     let mut articles = 0;
//!     for record in reader.records() {
//!         if record?.get("PT").is_some_and(|pt| pt == "J") {
//!             articles += 1;
//!         }
//!     }
//!     Ok(articles)
//! }
//! ```

use crate::error::Result;
use crate::record::RawRecord;

/// A source of raw WoS records.
///
/// Exhaustion is `Ok(None)`, not an error. Once a reader has returned
/// `Ok(None)` or an error it returns `Ok(None)` for good, and a record is
/// either returned whole or not at all.
pub trait FormatReader: std::fmt::Debug {
    /// Pull the next record.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed, cannot be decoded or
    /// cannot be read.
    fn read_record(&mut self) -> Result<Option<RawRecord>>;

    /// Drain the reader.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; records read before it are lost.
    fn read_all(&mut self) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Records returned so far, if the reader counts them.
    fn records_read(&self) -> Option<usize> {
        None
    }
}

impl<T: FormatReader + ?Sized> FormatReader for Box<T> {
    fn read_record(&mut self) -> Result<Option<RawRecord>> {
        (**self).read_record()
    }

    fn records_read(&self) -> Option<usize> {
        (**self).records_read()
    }
}

/// Iterator access for every [`FormatReader`].
pub trait FormatReaderExt: FormatReader {
    /// Borrow the reader as an iterator of `Result<RawRecord>`.
    fn records(&mut self) -> RecordIterator<'_, Self>
    where
        Self: Sized,
    {
        RecordIterator { reader: self }
    }
}

impl<T: FormatReader> FormatReaderExt for T {}

/// Iterator returned by [`FormatReaderExt::records`].
#[derive(Debug)]
pub struct RecordIterator<'a, R: FormatReader> {
    reader: &'a mut R,
}

impl<R: FormatReader> Iterator for RecordIterator<'_, R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WosError;

    /// Yields `total` numbered records, optionally failing at one position
    #[derive(Debug)]
    struct Numbered {
        total: usize,
        next: usize,
        fail_at: Option<usize>,
        stopped: bool,
    }

    impl Numbered {
        fn new(total: usize) -> Self {
            Numbered {
                total,
                next: 0,
                fail_at: None,
                stopped: false,
            }
        }
    }

    impl FormatReader for Numbered {
        fn read_record(&mut self) -> Result<Option<RawRecord>> {
            if self.stopped || self.next == self.total {
                self.stopped = true;
                return Ok(None);
            }
            if self.fail_at == Some(self.next) {
                self.stopped = true;
                return Err(WosError::structural(self.next, "broken record"));
            }
            let mut record = RawRecord::new();
            record.insert("UT".to_string(), format!("WOS:{:015}", self.next));
            self.next += 1;
            Ok(Some(record))
        }

        fn records_read(&self) -> Option<usize> {
            Some(self.next)
        }
    }

    #[test]
    fn test_read_all_in_order() {
        let mut reader = Numbered::new(3);
        let records = reader.read_all().unwrap();
        assert_eq!(records[2]["UT"], "WOS:000000000000002");
        assert_eq!(reader.records_read(), Some(3));
    }

    #[test]
    fn test_empty_source() {
        let mut reader = Numbered::new(0);
        assert!(reader.read_all().unwrap().is_empty());
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut reader = Numbered::new(5);
        reader.fail_at = Some(2);
        let results: Vec<_> = reader.records().collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
    }

    #[test]
    fn test_read_all_propagates_error() {
        let mut reader = Numbered::new(3);
        reader.fail_at = Some(1);
        assert!(matches!(reader.read_all(), Err(WosError::Structural { line: 1, .. })));
    }

    #[test]
    fn test_boxed_reader() {
        let mut reader: Box<dyn FormatReader> = Box::new(Numbered::new(2));
        assert_eq!(reader.records().count(), 2);
        assert_eq!(reader.records_read(), Some(2));
    }
}
