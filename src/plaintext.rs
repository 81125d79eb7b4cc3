//! Reading WoS "plain text" exports.
//!
//! A plain text export looks like this:
//!
//! ```text
//! FN Clarivate Analytics Web of Science
//! VR 1.0
//! PT J
//! AU Doe, J
//!    Foo, B
//! TI A title that is long enough
//!    to wrap
//! ER
//!
//! EF
//! ```
//!
//! Each field starts with a two-character tag. Lines indented by at least two
//! whitespace characters continue the previous field: for fields with one item
//! per line (authors, addresses, cited references) the fragments are joined
//! with the sub-delimiter, for free text they are joined with a space. `ER`
//! closes a record and `EF` closes the file.
//!
//! [`PlainTextReader`] drives an explicit reader state one line at a time,
//! so every error carries the line on which it was detected.

use crate::error::{Result, WosError};
use crate::formats::FormatReader;
use crate::record::RawRecord;
use crate::tags::TagRegistry;
use log::{debug, trace};
use std::io::BufRead;

/// The only plain text format version this reader understands.
pub const EXPECTED_VERSION: &str = "1.0";

/// Default string used to join one-item-per-line fragments.
pub const DEFAULT_SUBDELIMITER: &str = "; ";

const FILE_HEADER_TAG: &str = "FN";
const VERSION_TAG: &str = "VR";
const END_OF_RECORD: &str = "ER";
const END_OF_FILE: &str = "EF";

/// Syntactic class of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Continuation(&'a str),
    Field { tag: &'a str, value: &'a str },
}

impl<'a> LineKind<'a> {
    fn classify(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }

        let mut chars = line.chars();
        if matches!(
            (chars.next(), chars.next()),
            (Some(a), Some(b)) if a.is_whitespace() && b.is_whitespace()
        ) {
            return LineKind::Continuation(line.trim());
        }

        let line = line.trim_start();
        match line.find(char::is_whitespace) {
            Some(end) => LineKind::Field {
                tag: &line[..end],
                value: line[end..].trim_start(),
            },
            None => LineKind::Field {
                tag: line,
                value: "",
            },
        }
    }
}

/// What a single line did to the reader state.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// The line was absorbed; keep reading.
    Pending,
    /// An `ER` line completed this record.
    RecordEnd(RawRecord),
    /// An `EF` line ended the file between records.
    FileEnd,
}

/// Per-file traversal state of the plain text reader.
#[derive(Debug, Default)]
struct ReaderState {
    /// Number of physical lines consumed so far (1-based line of the last line)
    line_number: usize,
    /// Tag of the field being accumulated
    tag: Option<String>,
    /// Value fragments of that field, one per physical line
    fragments: Vec<String>,
    /// Fields of the current record finished so far
    record: RawRecord,
}

impl ReaderState {
    fn has_pending_record(&self) -> bool {
        self.tag.is_some() || !self.record.is_empty()
    }

    fn finish_field(&mut self, tags: &TagRegistry, subdelimiter: &str) {
        if let Some(tag) = self.tag.take() {
            let separator = if tags.has_item_per_line(&tag) {
                subdelimiter
            } else {
                " "
            };
            let value = self.fragments.join(separator);
            self.fragments.clear();
            self.record.insert(tag, value);
        }
    }

    /// Advance the state by one line.
    fn step(&mut self, line: &str, tags: &TagRegistry, subdelimiter: &str) -> Result<Step> {
        match LineKind::classify(line) {
            LineKind::Blank => Ok(Step::Pending),
            LineKind::Continuation(fragment) => {
                if self.tag.is_none() {
                    return Err(WosError::structural(
                        self.line_number,
                        "continuation line does not belong to any field",
                    ));
                }
                self.fragments.push(fragment.to_string());
                Ok(Step::Pending)
            },
            LineKind::Field {
                tag: END_OF_FILE, ..
            } => {
                if self.has_pending_record() {
                    return Err(WosError::structural(
                        self.line_number,
                        "Encountered unexpected end of file marker EF",
                    ));
                }
                Ok(Step::FileEnd)
            },
            LineKind::Field {
                tag: END_OF_RECORD, ..
            } => {
                self.finish_field(tags, subdelimiter);
                Ok(Step::RecordEnd(std::mem::take(&mut self.record)))
            },
            LineKind::Field { tag, value } => {
                self.finish_field(tags, subdelimiter);
                self.tag = Some(tag.to_string());
                self.fragments.push(value.to_string());
                Ok(Step::Pending)
            },
        }
    }
}

/// Reader for WoS plain text exports.
///
/// Reads from any [`BufRead`] source of UTF-8 text; use
/// [`TextEncoding::decoding_reader`](crate::TextEncoding::decoding_reader) for
/// UTF-16 or BOM-prefixed files, or let [`read`](crate::read) do it.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use wosfile::PlainTextReader;
///
/// let data = "FN Thomson Reuters Web of Science\nVR 1.0\nPT J\nAU xyz\nER\nEF";
/// let mut reader = PlainTextReader::new(Cursor::new(data))?;
///
/// let record = reader.read_record()?.unwrap();
/// assert_eq!(record["PT"], "J");
/// assert_eq!(record["AU"], "xyz");
/// assert!(reader.read_record()?.is_none());
/// # Ok::<(), wosfile::WosError>(())
/// ```
#[derive(Debug)]
pub struct PlainTextReader<'t, R> {
    reader: R,
    tags: &'t TagRegistry,
    subdelimiter: String,
    state: ReaderState,
    line: String,
    records_read: usize,
    done: bool,
}

impl<R: BufRead> PlainTextReader<'static, R> {
    /// Create a reader using the bundled WoS tag registry.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::Format`] if the file does not start with an `FN`
    /// line followed by `VR 1.0`.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_tags(reader, TagRegistry::wos())
    }
}

impl<'t, R: BufRead> PlainTextReader<'t, R> {
    /// Create a reader that looks up one-item-per-line tags in `tags`.
    ///
    /// The two preamble lines are read and validated immediately.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::Format`] if the file does not start with an `FN`
    /// line followed by `VR 1.0`.
    pub fn with_tags(reader: R, tags: &'t TagRegistry) -> Result<Self> {
        let mut reader = PlainTextReader {
            reader,
            tags,
            subdelimiter: DEFAULT_SUBDELIMITER.to_string(),
            state: ReaderState::default(),
            line: String::new(),
            records_read: 0,
            done: false,
        };
        reader.read_preamble()?;
        Ok(reader)
    }

    /// Set the string used to join fragments of one-item-per-line fields.
    #[must_use]
    pub fn with_subdelimiter(mut self, subdelimiter: &str) -> Self {
        self.subdelimiter = subdelimiter.to_string();
        self
    }

    /// The sub-delimiter in use
    #[must_use]
    pub fn subdelimiter(&self) -> &str {
        &self.subdelimiter
    }

    /// Line number of the last line consumed.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.state.line_number
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the `EF` marker has been read. After an error
    /// the reader is exhausted and keeps returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::Structural`] if `EF` appears inside a record, if
    /// the input ends before `EF`, or if a continuation line has no field to
    /// continue; I/O and decoding errors are passed through.
    pub fn read_record(&mut self) -> Result<Option<RawRecord>> {
        if self.done {
            return Ok(None);
        }

        let result = self.advance();
        match &result {
            Ok(Some(_)) => self.records_read += 1,
            Ok(None) | Err(_) => self.done = true,
        }
        result
    }

    fn advance(&mut self) -> Result<Option<RawRecord>> {
        loop {
            if !self.next_line()? {
                return Err(WosError::structural(
                    self.state.line_number,
                    "Encountered EOF before 'EF' marker",
                ));
            }

            match self
                .state
                .step(&self.line, self.tags, &self.subdelimiter)?
            {
                Step::Pending => {},
                Step::RecordEnd(record) => {
                    trace!(
                        "record {} complete at line {} ({} fields)",
                        self.records_read + 1,
                        self.state.line_number,
                        record.len()
                    );
                    return Ok(Some(record));
                },
                Step::FileEnd => {
                    debug!(
                        "EF marker on line {} after {} records",
                        self.state.line_number, self.records_read
                    );
                    return Ok(None);
                },
            }
        }
    }

    fn read_preamble(&mut self) -> Result<()> {
        if !self.next_nonblank_line()? || !self.line.starts_with(FILE_HEADER_TAG) {
            return Err(WosError::format(
                self.state.line_number,
                "Unknown file format: expected an FN line",
            ));
        }

        if !self.next_nonblank_line()? {
            return Err(WosError::format(
                self.state.line_number,
                "Missing version line",
            ));
        }
        let parts: Vec<&str> = self.line.split_whitespace().collect();
        if parts != [VERSION_TAG, EXPECTED_VERSION] {
            return Err(WosError::format(
                self.state.line_number,
                format!(
                    "Unknown version: expected {EXPECTED_VERSION} but got {:?}",
                    self.line
                ),
            ));
        }
        Ok(())
    }

    /// Load the next physical line into `self.line` without its terminator.
    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        self.state.line_number += 1;
        let content_len = self.line.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
        self.line.truncate(content_len);
        Ok(true)
    }

    fn next_nonblank_line(&mut self) -> Result<bool> {
        while self.next_line()? {
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<R: BufRead + std::fmt::Debug> FormatReader for PlainTextReader<'_, R> {
    fn read_record(&mut self) -> Result<Option<RawRecord>> {
        PlainTextReader::read_record(self)
    }

    fn records_read(&self) -> Option<usize> {
        Some(self.records_read)
    }
}
