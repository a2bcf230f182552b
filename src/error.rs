//! Error types for the SpyParty replay parser.
//!
//! This module defines the error hierarchy for all failure cases during
//! replay parsing: I/O errors, structural faults (undersized files, bad
//! magic bytes, unsupported format versions), and malformed header data.
//!
//! Structural faults never escalate past the single file being decoded;
//! batch callers use [`crate::ReplayRecord::decode`], which collapses every
//! error into an absent result so a directory scan keeps going.

use thiserror::Error;

/// The main error type for replay parsing operations.
///
/// # Example
///
/// ```
/// use spyparty_parser::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::InvalidHeader {
///         reason: "missing required field".to_string(),
///     })
/// }
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading the replay file.
    ///
    /// This wraps standard library I/O errors for seamless error propagation
    /// using the `?` operator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is smaller than the minimum size of a valid replay header.
    ///
    /// A replay needs at least [`crate::record::MIN_REPLAY_SIZE`] bytes to
    /// contain a complete header for any supported version.
    #[error("File too small: {actual} bytes, minimum is {minimum}")]
    FileTooSmall {
        /// The minimum number of bytes a valid replay file can have.
        minimum: usize,
        /// The actual file size.
        actual: usize,
    },

    /// The file's magic bytes do not match the replay signature.
    ///
    /// Replays must start with the 4-byte ASCII signature `RPLY` at
    /// offset 0.
    #[error("Invalid magic bytes: expected {expected}, found {found}")]
    InvalidMagic {
        /// The expected magic bytes (as hex string for display).
        expected: String,
        /// The actual bytes found at the start of the file (as hex string).
        found: String,
    },

    /// The file-format version has no known offset layout.
    ///
    /// Supported versions are 3 through 6. An unrecognized version is never
    /// decoded with a guessed default layout.
    #[error("Unsupported replay file version: {version}")]
    UnsupportedVersion {
        /// The version number read from offset 0x04.
        version: u32,
    },

    /// The replay header contains data that cannot be decoded.
    ///
    /// This covers malformed UTF-8 in name fields and enumeration codes
    /// outside their fixed tables (result, game mode).
    #[error("Invalid header: {reason}")]
    InvalidHeader {
        /// A description of what makes the header invalid.
        reason: String,
    },

    /// The data ended unexpectedly before the required bytes could be read.
    ///
    /// This typically indicates a truncated replay file whose offsets point
    /// past the end of the buffer.
    #[error("Unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },
}

impl ParserError {
    /// Creates an `InvalidMagic` error with the given byte slices.
    ///
    /// The bytes are converted to hex strings for human-readable display.
    ///
    /// # Example
    ///
    /// ```
    /// use spyparty_parser::error::ParserError;
    ///
    /// let err = ParserError::invalid_magic(b"RPLY", b"\x00\x00\x00\x00");
    /// assert!(err.to_string().contains("Invalid magic bytes"));
    /// ```
    #[must_use]
    pub fn invalid_magic(expected: &[u8], found: &[u8]) -> Self {
        ParserError::InvalidMagic {
            expected: bytes_to_hex(expected),
            found: bytes_to_hex(found),
        }
    }

    /// Creates an `UnexpectedEof` error with the given sizes.
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof {
            expected,
            available,
        }
    }

    /// Returns whether this error is a structural fault.
    ///
    /// Structural faults mean the input cannot be interpreted as a replay
    /// file at all (size, magic, version, truncation) as opposed to an I/O
    /// failure reading it.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, ParserError::Io(_))
    }
}

/// Converts a byte slice to a hexadecimal string representation.
///
/// If the slice is 8 bytes or less, formats as space-separated hex values.
/// If longer, shows the first 8 bytes followed by "...".
fn bytes_to_hex(bytes: &[u8]) -> String {
    if bytes.len() <= 8 {
        bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        let prefix: String = bytes[..8]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{prefix}... ({} bytes total)", bytes.len())
    }
}

/// A specialized Result type for replay parsing operations.
///
/// This is a convenience alias that uses `ParserError` as the error type.
pub type Result<T> = std::result::Result<T, ParserError>;
