//! Binary reading utilities for parsing replay files.
//!
//! This module provides functions for reading little-endian integers,
//! floats, byte slices, and exact-length UTF-8 strings from byte buffers.
//! All functions perform bounds checking and return appropriate errors for
//! truncated or malformed data; a corrupt offset never panics.
//!
//! # Endianness
//!
//! The replay format stores all multi-byte values in little-endian byte
//! order. The functions in this module handle the conversion automatically.
//!
//! # Example
//!
//! ```
//! use spyparty_parser::binary::{read_u16_le, read_u32_le, read_utf8};
//!
//! let data = [0x26, 0x89, 0x01, 0x00, b'H', b'i'];
//!
//! // Read a little-endian u16 at offset 0
//! assert_eq!(read_u16_le(&data, 0).unwrap(), 0x8926);
//!
//! // Read a little-endian u32 at offset 0
//! assert_eq!(read_u32_le(&data, 0).unwrap(), 0x0001_8926);
//!
//! // Read a 2-byte UTF-8 string at offset 4
//! assert_eq!(read_utf8(&data, 4, 2).unwrap(), "Hi");
//! ```

use crate::error::{ParserError, Result};

/// Reads a single byte from the buffer at the given offset.
///
/// The replay format uses single bytes as length prefixes for the
/// variable-length name fields.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the offset is beyond the buffer.
pub fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    bytes
        .get(offset)
        .copied()
        .ok_or_else(|| ParserError::unexpected_eof(offset + 1, bytes.len()))
}

/// Reads a little-endian u16 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 2 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use spyparty_parser::binary::read_u16_le;
///
/// let data = [0x34, 0x12, 0xFF, 0xFF];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0xFFFF);
/// ```
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    const SIZE: usize = 2;

    if offset + SIZE > bytes.len() {
        return Err(ParserError::unexpected_eof(offset + SIZE, bytes.len()));
    }

    let slice = &bytes[offset..offset + SIZE];
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a little-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use spyparty_parser::binary::read_u32_le;
///
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x1234_5678);
/// ```
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    const SIZE: usize = 4;

    if offset + SIZE > bytes.len() {
        return Err(ParserError::unexpected_eof(offset + SIZE, bytes.len()));
    }

    let slice = &bytes[offset..offset + SIZE];
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a little-endian f32 value from the byte buffer at the given offset.
///
/// The replay header stores the match duration as a 4-byte IEEE 754 float.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
pub fn read_f32_le(bytes: &[u8], offset: usize) -> Result<f32> {
    const SIZE: usize = 4;

    if offset + SIZE > bytes.len() {
        return Err(ParserError::unexpected_eof(offset + SIZE, bytes.len()));
    }

    let slice = &bytes[offset..offset + SIZE];
    Ok(f32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of bytes from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least `len` bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use spyparty_parser::binary::read_bytes;
///
/// let data = b"RPLY\x06\x00\x00\x00";
/// let magic = read_bytes(data, 0, 4).unwrap();
/// assert_eq!(magic, b"RPLY");
/// ```
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    if offset + len > bytes.len() {
        return Err(ParserError::unexpected_eof(offset + len, bytes.len()));
    }

    Ok(&bytes[offset..offset + len])
}

/// Reads an exact-length UTF-8 string from the buffer at the given offset.
///
/// The replay format stores names as raw bytes whose length comes from a
/// separate one-byte prefix, so the caller always knows the exact length.
///
/// # Errors
///
/// - Returns `ParserError::UnexpectedEof` if offset + len is beyond the buffer
/// - Returns `ParserError::InvalidHeader` if the bytes are not valid UTF-8
///
/// # Example
///
/// ```
/// use spyparty_parser::binary::read_utf8;
///
/// let data = b"\x05magpie";
/// assert_eq!(read_utf8(data, 1, 5).unwrap(), "magpi");
/// ```
pub fn read_utf8(bytes: &[u8], offset: usize, len: usize) -> Result<String> {
    let slice = read_bytes(bytes, offset, len)?;

    String::from_utf8(slice.to_vec()).map_err(|e| ParserError::InvalidHeader {
        reason: format!("Invalid UTF-8 string at offset {offset}: {e}"),
    })
}
