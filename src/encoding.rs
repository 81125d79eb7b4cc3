//! Character encoding support for WoS export files.
//!
//! WoS exports come in three byte-level flavours:
//! - **UTF-8** without a byte-order mark
//! - **UTF-8 with BOM** (`EF BB BF`), typical of "Windows" exports
//! - **UTF-16** with a BOM of either endianness
//!
//! [`sniff_encoding`] picks one of them from the first bytes of a seekable
//! stream, and [`DecodingReader`] turns the raw bytes into validated UTF-8
//! text, stripping the BOM on the way.

use crate::error::Result;
use encoding_rs::{Decoder, DecoderResult, Encoding, UTF_16LE, UTF_8};
use std::fmt;
use std::io::{self, BufRead, Read, Seek, SeekFrom};

/// Number of bytes inspected for a byte-order mark.
const BOM_SNIFF_LEN: usize = 4;

const BUFFER_SIZE: usize = 8 * 1024;

/// Text encoding of a WoS export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 without byte-order mark
    Utf8,
    /// UTF-8 with a leading byte-order mark, which is stripped
    Utf8Bom,
    /// UTF-16 with a byte-order mark that selects the endianness
    Utf16,
}

impl TextEncoding {
    /// Choose an encoding from the leading bytes of a file.
    ///
    /// Falls back to [`TextEncoding::Utf8`] when no BOM is present.
    #[must_use]
    pub fn from_bom(prefix: &[u8]) -> Self {
        match Encoding::for_bom(prefix) {
            Some((encoding, _)) if encoding == UTF_8 => TextEncoding::Utf8Bom,
            Some(_) => TextEncoding::Utf16,
            None => TextEncoding::Utf8,
        }
    }

    /// Parse an encoding label (`utf-8`, `utf-8-sig`, `utf-16`), case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Some(TextEncoding::Utf8Bom),
            "utf-16" | "utf16" => Some(TextEncoding::Utf16),
            _ => None,
        }
    }

    /// The label of this encoding
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Utf16 => "utf-16",
        }
    }

    fn new_decoder(self) -> Decoder {
        match self {
            TextEncoding::Utf8 => UTF_8.new_decoder_without_bom_handling(),
            TextEncoding::Utf8Bom => UTF_8.new_decoder_with_bom_removal(),
            // BOM sniffing switches to big-endian when the file says so.
            TextEncoding::Utf16 => UTF_16LE.new_decoder(),
        }
    }

    /// Wrap a byte source in a decoder producing UTF-8 text.
    pub fn decoding_reader<R: Read>(self, reader: R) -> DecodingReader<R> {
        DecodingReader::new(reader, self)
    }

    /// Decode the first bytes of a file for sniffing.
    ///
    /// Malformed sequences are replaced and an incomplete sequence at the end
    /// of `bytes` is ignored, so any prefix length is acceptable.
    #[must_use]
    pub fn decode_prefix(self, bytes: &[u8]) -> String {
        let mut decoder = self.new_decoder();
        let capacity = decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len() * 3);
        let mut text = String::with_capacity(capacity);
        let _ = decoder.decode_to_string(bytes, &mut text, false);
        text
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Guess the encoding of a WoS export from its byte-order mark.
///
/// The stream is returned to the position it had on entry, so the caller can
/// start a fresh decoding pass.
///
/// # Errors
///
/// Returns an error only if reading or seeking the stream fails.
pub fn sniff_encoding<R: Read + Seek>(reader: &mut R) -> Result<TextEncoding> {
    let start = reader.stream_position()?;
    let mut prefix = Vec::with_capacity(BOM_SNIFF_LEN);
    reader
        .by_ref()
        .take(BOM_SNIFF_LEN as u64)
        .read_to_end(&mut prefix)?;
    reader.seek(SeekFrom::Start(start))?;

    Ok(TextEncoding::from_bom(&prefix))
}

/// Streaming decoder from encoded bytes to UTF-8.
///
/// Implements both [`Read`] and [`BufRead`]; the decoded text is buffered
/// internally, so no extra `BufReader` is needed. Malformed input yields an
/// [`io::Error`] of kind [`io::ErrorKind::InvalidData`].
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    input: Vec<u8>,
    input_pos: usize,
    input_len: usize,
    input_done: bool,
    output: Vec<u8>,
    output_pos: usize,
    output_len: usize,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    /// Create a decoding reader over `inner`.
    pub fn new(inner: R, encoding: TextEncoding) -> Self {
        DecodingReader {
            inner,
            decoder: encoding.new_decoder(),
            input: vec![0; BUFFER_SIZE],
            input_pos: 0,
            input_len: 0,
            input_done: false,
            output: vec![0; BUFFER_SIZE],
            output_pos: 0,
            output_len: 0,
            finished: false,
        }
    }

    /// Consume the decoder and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_input(&mut self) -> io::Result<()> {
        loop {
            match self.inner.read(&mut self.input) {
                Ok(n) => {
                    self.input_pos = 0;
                    self.input_len = n;
                    self.input_done = n == 0;
                    return Ok(());
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(e),
            }
        }
    }

    fn fill_output(&mut self) -> io::Result<()> {
        while self.output_pos == self.output_len && !self.finished {
            if self.input_pos == self.input_len && !self.input_done {
                self.fill_input()?;
            }

            let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(
                &self.input[self.input_pos..self.input_len],
                &mut self.output,
                self.input_done,
            );
            self.input_pos += read;
            self.output_pos = 0;
            self.output_len = written;

            match result {
                DecoderResult::Malformed(_, _) => {
                    self.output_len = 0;
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("malformed {} input", self.decoder.encoding().name()),
                    ));
                },
                DecoderResult::InputEmpty if self.input_done => self.finished = true,
                DecoderResult::InputEmpty | DecoderResult::OutputFull => {},
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for DecodingReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.fill_output()?;
        Ok(&self.output[self.output_pos..self.output_len])
    }

    fn consume(&mut self, amt: usize) {
        self.output_pos = (self.output_pos + amt).min(self.output_len);
    }
}

impl<R> fmt::Debug for DecodingReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodingReader")
            .field("encoding", &self.decoder.encoding().name())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    fn utf16be_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        bytes
    }

    fn decode_all(bytes: Vec<u8>, encoding: TextEncoding) -> io::Result<String> {
        let mut text = String::new();
        encoding
            .decoding_reader(Cursor::new(bytes))
            .read_to_string(&mut text)?;
        Ok(text)
    }

    #[test]
    fn test_from_bom() {
        assert_eq!(TextEncoding::from_bom(b"\xEF\xBB\xBFPT"), TextEncoding::Utf8Bom);
        assert_eq!(TextEncoding::from_bom(b"\xFF\xFEP\x00"), TextEncoding::Utf16);
        assert_eq!(TextEncoding::from_bom(b"\xFE\xFF\x00P"), TextEncoding::Utf16);
        assert_eq!(TextEncoding::from_bom(b"FN T"), TextEncoding::Utf8);
        assert_eq!(TextEncoding::from_bom(b""), TextEncoding::Utf8);
    }

    #[test]
    fn test_sniff_rewinds() {
        let mut cursor = Cursor::new(b"\xEF\xBB\xBFPT\tAU\n".to_vec());
        assert_eq!(sniff_encoding(&mut cursor).unwrap(), TextEncoding::Utf8Bom);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_sniff_short_input() {
        let mut cursor = Cursor::new(b"F".to_vec());
        assert_eq!(sniff_encoding(&mut cursor).unwrap(), TextEncoding::Utf8);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_label_roundtrip() {
        for encoding in [TextEncoding::Utf8, TextEncoding::Utf8Bom, TextEncoding::Utf16] {
            assert_eq!(TextEncoding::from_label(encoding.label()), Some(encoding));
        }
        assert_eq!(TextEncoding::from_label("UTF-16"), Some(TextEncoding::Utf16));
        assert_eq!(TextEncoding::from_label("latin-1"), None);
    }

    #[test]
    fn test_decode_utf8_bom_stripped() {
        let text = decode_all(b"\xEF\xBB\xBFPT\tAU".to_vec(), TextEncoding::Utf8Bom).unwrap();
        assert_eq!(text, "PT\tAU");
    }

    #[test]
    fn test_decode_utf16_both_endians() {
        let le = decode_all(utf16le_with_bom("FN Caf\u{e9}\n"), TextEncoding::Utf16).unwrap();
        let be = decode_all(utf16be_with_bom("FN Caf\u{e9}\n"), TextEncoding::Utf16).unwrap();
        assert_eq!(le, "FN Caf\u{e9}\n");
        assert_eq!(be, le);
    }

    #[test]
    fn test_decode_large_input_spans_buffers() {
        let line = "AU Doe, J\u{f6}rg\n";
        let source = line.repeat(3 * BUFFER_SIZE / line.len());
        let text = decode_all(utf16le_with_bom(&source), TextEncoding::Utf16).unwrap();
        assert_eq!(text, source);
    }

    #[test]
    fn test_decode_malformed_utf8() {
        let err = decode_all(b"PT J\n\xFF\xFE\xFD".to_vec(), TextEncoding::Utf8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_prefix_ignores_split_character() {
        let bytes = "FN \u{e9}".as_bytes();
        let prefix = TextEncoding::Utf8.decode_prefix(&bytes[..bytes.len() - 1]);
        assert_eq!(prefix, "FN ");
    }

    #[test]
    fn test_decoding_reader_lines() {
        let reader = TextEncoding::Utf8.decoding_reader(Cursor::new(b"a\nb\r\nc".to_vec()));
        let lines: Vec<String> = reader.lines().collect::<io::Result<_>>().unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
