//! UTF-8 to UTF-16 unit arithmetic.
//!
//! Byte positions address UTF-8 storage; character positions count UTF-16
//! code units. These helpers work on raw bytes so that every encoded unit,
//! including each `\r` and `\n` of a CRLF pair, is counted on its own.

/// Number of bytes in the UTF-8 sequence introduced by `lead`.
///
/// Continuation and invalid lead bytes report 1 so that a walk over
/// malformed input always makes progress.
#[inline]
pub fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// UTF-16 units taken by a code point encoded in `sequence_len` UTF-8 bytes.
///
/// Only 4-byte sequences lie outside the Basic Multilingual Plane and need a
/// surrogate pair.
#[inline]
pub fn utf16_width(sequence_len: usize) -> usize {
    if sequence_len == 4 { 2 } else { 1 }
}

/// Counts the UTF-16 units encoded by `bytes`.
///
/// Continuation bytes are skipped; each lead byte contributes the width of
/// its code point.
pub fn utf16_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .filter(|&&b| !is_continuation(b))
        .map(|&b| utf16_width(utf8_sequence_len(b)))
        .sum()
}

/// Returns true if `byte` continues a multibyte UTF-8 sequence.
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
