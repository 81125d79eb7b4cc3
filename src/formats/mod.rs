//! Export format support for WoS files.
//!
//! Web of Science offers two export serializations with the same field tags:
//!
//! | Format | Reader | Description |
//! |--------|--------|-------------|
//! | Plain text | [`PlainTextReader`](crate::plaintext::PlainTextReader) | One line per field, continuation lines indented |
//! | Tab-delimited | [`TabDelimitedReader`](crate::tab_delimited::TabDelimitedReader) | Header row of tags, one row per record |
//!
//! Both readers implement [`FormatReader`], and [`detect_format`] /
//! [`sniff_format`] pick the right one for an unknown file.
//!
//! # Usage
//!
//! ```
//! use std::io::Cursor;
//! use wosfile::formats::{FormatReader, FormatReaderExt};
//! use wosfile::PlainTextReader;
//!
//! let data = "FN Clarivate Analytics Web of Science\nVR 1.0\nPT J\nAU Doe, J\nER\nEF\n";
//! let mut reader = PlainTextReader::new(Cursor::new(data))?;
//! for record in reader.records() {
//!     println!("{:?}", record?.get("AU"));
//! }
//! # Ok::<(), wosfile::WosError>(())
//! ```

mod sniff;
mod traits;

pub use sniff::{detect_format, sniff_format, ExportFormat};
pub use traits::{FormatReader, FormatReaderExt, RecordIterator};
