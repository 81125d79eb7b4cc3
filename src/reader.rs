//! Reading WoS export files of any supported encoding and format.
//!
//! [`read`] and [`records_from`] take a list of paths and return lazy
//! iterators. Files are opened one after the other: the next file is only
//! opened once the previous one is exhausted. For each file the encoding is
//! detected from its byte-order mark and the format from its first
//! characters, unless [`ReadOptions`] fixes them.
//!
//! # Examples
//!
//! ```no_run
//! use wosfile::{records_from, ReadOptions};
//!
//! for record in records_from(["savedrecs.txt", "savedrecs(1).txt"], ReadOptions::default()) {
//!     let record = record?;
//!     println!("{}", record.record_id()?);
//! }
//! # Ok::<(), wosfile::WosError>(())
//! ```
//!
//! Reading from memory:
//!
//! ```
//! use std::io::Cursor;
//! use wosfile::formats::FormatReaderExt;
//! use wosfile::{reader_from, ReadOptions};
//!
//! let data = "PT\tAU\tPY\nJ\tDoe, J\t2016\t\n";
//! let mut reader = reader_from(Cursor::new(data), &ReadOptions::default())?;
//! let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
//! assert_eq!(records[0]["AU"], "Doe, J");
//! # Ok::<(), wosfile::WosError>(())
//! ```

use crate::encoding::{sniff_encoding, TextEncoding};
use crate::error::{Result, WosError};
use crate::formats::{sniff_format, ExportFormat, FormatReader};
use crate::plaintext::{PlainTextReader, DEFAULT_SUBDELIMITER};
use crate::record::{RawRecord, Record};
use crate::tab_delimited::TabDelimitedReader;
use crate::tags::TagRegistry;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

/// Options for reading WoS export files.
///
/// # Examples
///
/// ```
/// use wosfile::{ExportFormat, ReadOptions, TextEncoding};
///
/// let options = ReadOptions::default()
///     .with_encoding(TextEncoding::Utf16)
///     .with_format(ExportFormat::TabDelimited)
///     .with_skip_empty(false);
/// assert_eq!(options.subdelimiter, "; ");
/// ```
#[derive(Debug, Clone)]
pub struct ReadOptions<'t> {
    /// Text encoding; detected from the byte-order mark when `None`
    pub encoding: Option<TextEncoding>,
    /// Export format; detected from the first characters when `None`
    pub format: Option<ExportFormat>,
    /// Join string for one-item-per-line fields in plain text exports
    pub subdelimiter: String,
    /// Leave out fields with an empty value when normalizing
    pub skip_empty: bool,
    /// Tag registry used for continuation joining and field splitting
    pub tags: &'t TagRegistry,
}

impl Default for ReadOptions<'static> {
    fn default() -> Self {
        ReadOptions {
            encoding: None,
            format: None,
            subdelimiter: DEFAULT_SUBDELIMITER.to_string(),
            skip_empty: true,
            tags: TagRegistry::wos(),
        }
    }
}

impl<'t> ReadOptions<'t> {
    /// Use `encoding` instead of detecting it.
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Use `format` instead of detecting it.
    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the join string for one-item-per-line fields.
    #[must_use]
    pub fn with_subdelimiter(mut self, subdelimiter: &str) -> Self {
        self.subdelimiter = subdelimiter.to_string();
        self
    }

    /// Set whether normalized records leave out empty fields.
    #[must_use]
    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    /// Use a different tag registry.
    #[must_use]
    pub fn with_tags<'u>(self, tags: &'u TagRegistry) -> ReadOptions<'u> {
        ReadOptions {
            encoding: self.encoding,
            format: self.format,
            subdelimiter: self.subdelimiter,
            skip_empty: self.skip_empty,
            tags,
        }
    }
}

/// Build the reader for a seekable byte source.
///
/// Encoding and format are detected unless fixed in `options`; the source is
/// rewound after detection.
///
/// # Errors
///
/// Returns [`WosError::Format`](crate::WosError::Format) if the format cannot
/// be determined or the plain text preamble is wrong, or the underlying I/O
/// error.
pub fn reader_from<'t, R>(source: R, options: &ReadOptions<'t>) -> Result<Box<dyn FormatReader + 't>>
where
    R: Read + Seek + 't,
{
    detect_and_build(source, options).map(|(_, reader)| reader)
}

fn detect_and_build<'t, R>(
    mut source: R,
    options: &ReadOptions<'t>,
) -> Result<(ExportFormat, Box<dyn FormatReader + 't>)>
where
    R: Read + Seek + 't,
{
    let encoding = match options.encoding {
        Some(encoding) => encoding,
        None => sniff_encoding(&mut source)?,
    };
    let format = match options.format {
        Some(format) => format,
        None => sniff_format(&mut source, encoding)?,
    };
    debug!("reading {format} export in {encoding}");

    let text = encoding.decoding_reader(source);
    let reader: Box<dyn FormatReader + 't> = match format {
        ExportFormat::PlainText => Box::new(
            PlainTextReader::with_tags(text, options.tags)?.with_subdelimiter(&options.subdelimiter),
        ),
        ExportFormat::TabDelimited => Box::new(TabDelimitedReader::new(text)?),
    };
    Ok((format, reader))
}

/// Open `path` and build its reader.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or anything
/// [`reader_from`] returns.
pub fn open_reader<'t>(path: impl AsRef<Path>, options: &ReadOptions<'t>) -> Result<Box<dyn FormatReader + 't>> {
    open_detected(path.as_ref(), options).map(|(_, reader)| reader)
}

fn open_detected<'t>(path: &Path, options: &ReadOptions<'t>) -> Result<(ExportFormat, Box<dyn FormatReader + 't>)> {
    debug!("opening {}", path.display());
    let file = File::open(path)?;
    detect_and_build(BufReader::new(file), options)
}

/// Read the raw records of all `paths`, in order.
///
/// Nothing is opened until the iterator is advanced.
///
/// # Examples
///
/// ```no_run
/// use wosfile::{read, ReadOptions};
///
/// let count = read(["savedrecs.txt"], ReadOptions::default()).count();
/// ```
pub fn read<'t, I, P>(paths: I, options: ReadOptions<'t>) -> RawRecords<'t>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    RawRecords {
        paths: paths
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect::<Vec<_>>()
            .into_iter(),
        options,
        current: None,
        format: None,
        records_read: 0,
        failed: false,
    }
}

/// Read the normalized records of all `paths`, in order.
///
/// Each raw record is normalized with the `skip_empty` setting and tag
/// registry from `options`. List fields of plain text exports are split on
/// the configured sub-delimiter; tab-delimited exports always use `;`.
pub fn records_from<'t, I, P>(paths: I, options: ReadOptions<'t>) -> Records<'t>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Records {
        raw: read(paths, options),
    }
}

/// Iterator over the raw records of several files.
///
/// Yields the first error it encounters and then ends.
#[derive(Debug)]
pub struct RawRecords<'t> {
    paths: std::vec::IntoIter<PathBuf>,
    options: ReadOptions<'t>,
    current: Option<Box<dyn FormatReader + 't>>,
    /// Format of the file the last record came from
    format: Option<ExportFormat>,
    records_read: usize,
    failed: bool,
}

impl RawRecords<'_> {
    /// Number of records yielded so far, over all files
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    fn fail<T>(&mut self, err: WosError) -> Option<Result<T>> {
        self.failed = true;
        self.current = None;
        Some(Err(err))
    }
}

impl Iterator for RawRecords<'_> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if let Some(reader) = self.current.as_mut() {
                match reader.read_record() {
                    Ok(Some(record)) => {
                        self.records_read += 1;
                        return Some(Ok(record));
                    },
                    Ok(None) => {
                        debug!("file exhausted after {:?} records", reader.records_read());
                        self.current = None;
                    },
                    Err(err) => return self.fail(err),
                }
                continue;
            }

            let path = self.paths.next()?;
            match open_detected(&path, &self.options) {
                Ok((format, reader)) => {
                    self.format = Some(format);
                    self.current = Some(reader);
                },
                Err(err) => return self.fail(err),
            }
        }
    }
}

impl FusedIterator for RawRecords<'_> {}

/// Iterator over the normalized records of several files.
///
/// Yields the first error it encounters and then ends.
#[derive(Debug)]
pub struct Records<'t> {
    raw: RawRecords<'t>,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.raw.next()? {
            Ok(raw) => raw,
            Err(err) => return Some(Err(err)),
        };

        let options = &self.raw.options;
        let mut record = Record::new().with_skip_empty(options.skip_empty);
        if self.raw.format == Some(ExportFormat::PlainText) {
            record = record.with_subdelimiter(&options.subdelimiter);
        }
        record.parse_with(&raw, options.tags);
        Some(Ok(record))
    }
}

impl FusedIterator for Records<'_> {}
