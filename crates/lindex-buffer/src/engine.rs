//! The byte-oriented text engine seen from the line index.
//!
//! ## Learning: Traits as Seams
//!
//! The line index never owns text. It asks a [`TextEngine`] for byte
//! offsets and line boundaries, and is told about every edit through an
//! [`EditNotification`]. Any storage (a native editing component, a rope, the
//! in-crate [`Utf8Text`](crate::Utf8Text)) can sit behind the trait.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::units;

/// Queries the line index makes against the text it tracks.
///
/// All positions are byte offsets into UTF-8 storage. Line lengths include
/// the line terminator.
pub trait TextEngine {
    /// Number of lines; an empty text has one line.
    fn line_count(&self) -> usize;

    /// Line containing `byte_pos`. `total_byte_length()` maps to the last line.
    fn line_from_byte_position(&self, byte_pos: usize) -> usize;

    /// Byte offset where `line` starts.
    fn byte_start_of_line(&self, line: usize) -> usize;

    /// Byte length of `line`, terminator included.
    fn byte_length_of_line(&self, line: usize) -> usize;

    /// Total number of bytes.
    fn total_byte_length(&self) -> usize;

    /// Raw bytes of `[byte_pos, byte_pos + byte_len)`.
    fn byte_range(&self, byte_pos: usize, byte_len: usize) -> Cow<'_, [u8]>;

    /// Byte offset of the code point following the one at `byte_pos`.
    fn next_code_point_byte_position(&self, byte_pos: usize) -> usize;

    /// UTF-16 units encoded by `[byte_pos, byte_pos + byte_len)`.
    ///
    /// CR and LF are separate units; a CRLF pair counts as two.
    fn decode_byte_range_to_char_count(&self, byte_pos: usize, byte_len: usize) -> usize {
        units::utf16_len(&self.byte_range(byte_pos, byte_len))
    }
}

/// What an edit did to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Bytes were inserted
    Insert,
    /// Bytes were deleted
    Delete,
}

/// Notification sent by the engine after each edit, in edit order.
///
/// By the time it is delivered the engine already reflects the edit, so
/// queries made while handling it see post-edit offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNotification<'a> {
    /// Insert or delete
    pub kind: EditKind,

    /// Byte offset of the edit
    pub position: usize,

    /// Number of bytes inserted or deleted
    pub length: usize,

    /// Net change in line count; negative for deletes that join lines
    pub lines_added: isize,

    /// The inserted or deleted bytes, when the engine provides them
    pub text: Option<Cow<'a, [u8]>>,
}

impl<'a> EditNotification<'a> {
    /// Creates an insert notification carrying the inserted bytes.
    pub fn insert(position: usize, text: &'a [u8], lines_added: usize) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            length: text.len(),
            lines_added: lines_added as isize,
            text: Some(Cow::Borrowed(text)),
        }
    }

    /// Creates a delete notification carrying the deleted bytes.
    pub fn delete(position: usize, text: impl Into<Cow<'a, [u8]>>, lines_removed: usize) -> Self {
        let text = text.into();
        Self {
            kind: EditKind::Delete,
            position,
            length: text.len(),
            lines_added: -(lines_removed as isize),
            text: Some(text),
        }
    }

    /// Creates a notification without the edited bytes attached.
    pub fn without_text(kind: EditKind, position: usize, length: usize, lines_added: isize) -> Self {
        Self {
            kind,
            position,
            length,
            lines_added,
            text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_constructors() {
        let insert = EditNotification::insert(3, b"ab\ncd", 1);
        assert_eq!(insert.kind, EditKind::Insert);
        assert_eq!(insert.length, 5);
        assert_eq!(insert.lines_added, 1);

        let delete = EditNotification::delete(0, b"x\n\n".to_vec(), 2);
        assert_eq!(delete.kind, EditKind::Delete);
        assert_eq!(delete.length, 3);
        assert_eq!(delete.lines_added, -2);
    }
}
