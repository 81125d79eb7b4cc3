//! Error types for WoS export reading.
//!
//! This module provides the [`WosError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all WoS library operations.
///
/// Every variant is fatal to the traversal that produced it. Reader errors
/// carry the 1-based line number at which the problem was detected.
#[derive(Error, Debug)]
pub enum WosError {
    /// The file is not in a recognized export format, or its header or
    /// version line is wrong.
    #[error("Format error on line {line}: {message}")]
    Format {
        /// Line number where the problem was detected (0 if not line-bound)
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Record framing is broken: an end-of-file marker inside a record, or
    /// input that ends before the end-of-file marker.
    #[error("Structural error on line {line}: {message}")]
    Structural {
        /// Line number where the problem was detected
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// A correlated segment of an address field does not have the
    /// `[Authors] Address` shape.
    #[error("Could not parse '{segment}' as address field (in '{field}')")]
    MalformedAddress {
        /// The offending segment
        segment: String,
        /// The complete raw address field
        field: String,
    },

    /// A field required for the requested operation is absent.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Input bytes are not valid in the selected text encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The tab-delimited reader failed to parse a row.
    #[error("Tab-delimited parse error: {0}")]
    Delimited(#[from] csv::Error),

    /// A record could not be converted to JSON.
    #[error("JSON serialization error: {0}")]
    Json(serde_json::Error),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    IoError(std::io::Error),
}

impl WosError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        WosError::Format {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structural(line: usize, message: impl Into<String>) -> Self {
        WosError::Structural {
            line,
            message: message.into(),
        }
    }
}

// The decoding reader reports malformed input as `InvalidData`; keep that
// distinguishable from genuine I/O failures.
impl From<std::io::Error> for WosError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::InvalidData {
            WosError::Encoding(err.to_string())
        } else {
            WosError::IoError(err)
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`WosError`].
pub type Result<T> = std::result::Result<T, WosError>;
