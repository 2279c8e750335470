//! Base64 codec (RFC 2045)
//!
//! XMP stores embedded thumbnails as base64 text inside the packet. The
//! `base64` crate does the bit work; this module adds the packet layout on
//! top. Encoded text is wrapped into lines, and the decoder is lenient about
//! layout: whitespace is skipped anywhere, the first `=` ends the data, and
//! invalid symbols can optionally be ignored instead of aborting.

use crate::core::error::{XmpError, XmpResult};
use ::base64::alphabet;
use ::base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use ::base64::engine::DecodePaddingMode;
use ::base64::Engine;

/// Decoder accepting unpadded groups and non-zero trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Exact length of `encode(input, line_wrap_column)` for an input of `input_len` bytes
pub fn encoded_len(input_len: usize, line_wrap_column: usize) -> usize {
    let chars = input_len.div_ceil(3) * 4;
    if line_wrap_column == 0 {
        chars
    } else {
        chars + chars.div_ceil(line_wrap_column)
    }
}

/// Encode bytes as base64 text
///
/// When `line_wrap_column` is non-zero, a newline is inserted after every
/// `line_wrap_column` encoded characters and after the last (partial) line.
pub fn encode(input: &[u8], line_wrap_column: usize) -> String {
    let encoded = STANDARD.encode(input);
    if line_wrap_column == 0 {
        return encoded;
    }

    let mut out = String::with_capacity(encoded_len(input.len(), line_wrap_column));
    for (column, c) in encoded.chars().enumerate() {
        if column > 0 && column % line_wrap_column == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Decode base64 text
///
/// Whitespace is skipped and decoding stops at the first `=`. An invalid
/// byte fails with [`XmpError::InvalidBase64`] unless `ignore_errors` is set,
/// in which case it is skipped. A trailing group of 2 or 3 symbols yields 1
/// or 2 bytes; a single dangling symbol is dropped.
pub fn decode(input: impl AsRef<[u8]>, ignore_errors: bool) -> XmpResult<Vec<u8>> {
    let input = input.as_ref();
    let mut symbols = Vec::with_capacity(input.len());

    for (offset, &byte) in input.iter().enumerate() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => symbols.push(byte),
            b' ' | b'\t' | b'\r' | b'\n' => {}
            b'=' => break,
            _ => {
                if !ignore_errors {
                    return Err(XmpError::InvalidBase64 { offset, byte });
                }
            }
        }
    }

    // a single symbol carries fewer than 8 bits
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }
    LENIENT
        .decode(&symbols)
        .map_err(|e| XmpError::ParseError(format!("Invalid base64 data: {}", e)))
}
