#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`reader`] — Opening files, format and encoding detection, multi-file iteration
//! - [`plaintext`] — Plain text exports (`FN`/`VR` preamble, `ER`/`EF` markers)
//! - [`tab_delimited`] — Tab-delimited exports (header row of tags)
//! - [`formats`] — The [`FormatReader`] trait and format sniffing
//! - [`encoding`] — Byte-order mark detection and streaming decoding
//! - [`record`] — Raw and normalized records
//! - [`tags`] — The WoS field tag registry
//! - [`address`] — Parsing of the author/address field
//! - [`identifier`] — Citation keys
//! - [`json`] — JSON view of normalized records
//! - [`error`] — Error types and result type
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and does not
//! install a logger. Detected formats and opened files are logged at `debug`,
//! per-record progress at `trace`.

pub mod address;
pub mod encoding;
pub mod error;
/// Export format detection and the reader trait shared by both formats.
///
/// See the [`formats`] module documentation for details.
pub mod formats;
pub mod identifier;
pub mod json;
pub mod plaintext;
pub mod reader;
/// Raw and normalized WoS records
pub mod record;
pub mod tab_delimited;
pub mod tags;

pub use address::{parse_address_field, AddressMapping};
pub use encoding::{sniff_encoding, DecodingReader, TextEncoding};
pub use error::{Result, WosError};
pub use formats::{detect_format, sniff_format, ExportFormat, FormatReader, FormatReaderExt};
pub use plaintext::PlainTextReader;
pub use reader::{open_reader, read, reader_from, records_from, RawRecords, ReadOptions, Records};
pub use record::{FieldValue, RawRecord, Record};
pub use tab_delimited::TabDelimitedReader;
pub use tags::{TagRegistry, TagSpec};
