//! In-memory UTF-8 text engine backed by a gap sequence of bytes.
//!
//! ## Why a Reference Engine?
//!
//! The line index is written against the [`TextEngine`] trait and is meant to
//! sit next to a real editing component. `Utf8Text` is the smallest engine
//! that behaves like one: it stores bytes, knows its line boundaries, and
//! reports every edit as an [`EditNotification`] after applying it.
//!
//! Lines end after `\n`. A `\r` is ordinary content, so a CRLF line ends at
//! its LF and joining or splitting a CRLF pair never changes the line count.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;
use uuid::Uuid;

use crate::engine::{EditNotification, TextEngine};
use crate::gap::GapSequence;
use crate::units;
use crate::{BufferError, BufferResult};

/// Identity of a backing buffer.
///
/// A line index is only valid for the buffer it was rebuilt against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(Uuid);

impl BufferId {
    /// Creates a new unique buffer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BufferId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bytes taken out of the text by [`Utf8Text::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    /// Byte offset the deletion started at
    pub position: usize,
    /// The deleted bytes
    pub bytes: Vec<u8>,
    /// Number of line breaks that were deleted
    pub lines_removed: usize,
}

impl Removed {
    /// The notification describing this deletion.
    pub fn notification(&self) -> EditNotification<'_> {
        EditNotification::delete(self.position, self.bytes.as_slice(), self.lines_removed)
    }
}

/// A UTF-8 text buffer that tracks line starts.
#[derive(Debug, Clone)]
pub struct Utf8Text {
    /// Identity of this buffer
    id: BufferId,

    /// The encoded text
    bytes: GapSequence<u8>,

    /// Byte offset of each line start; always begins with 0
    line_starts: Vec<usize>,
}

impl Utf8Text {
    /// Creates an empty text with one empty line.
    pub fn new() -> Self {
        Self {
            id: BufferId::new(),
            bytes: GapSequence::new(),
            line_starts: vec![0],
        }
    }

    /// Loads a text from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from(content.as_str()))
    }

    /// Identity of this buffer.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Returns the whole text.
    pub fn text(&self) -> String {
        let (head, tail) = self.bytes.as_slices();
        let mut out = String::with_capacity(self.bytes.len());
        // Edits only land on char boundaries, so both halves stay valid.
        out.push_str(&String::from_utf8_lossy(head));
        out.push_str(&String::from_utf8_lossy(tail));
        out
    }

    /// Returns true if the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // ==================== Mutations ====================

    /// Inserts `text` at `byte_pos` and returns the notification for it.
    ///
    /// # Errors
    ///
    /// Fails if `byte_pos` is past the end or inside a multibyte sequence.
    pub fn insert<'t>(&mut self, byte_pos: usize, text: &'t str) -> BufferResult<EditNotification<'t>> {
        self.check_boundary(byte_pos)?;

        let inserted = text.as_bytes();
        self.bytes.insert_range(byte_pos, inserted.iter().copied());

        let line = self.line_from_byte_position(byte_pos);
        for start in &mut self.line_starts[line + 1..] {
            *start += inserted.len();
        }
        let new_starts: Vec<usize> = inserted
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == b'\n')
            .map(|(i, _)| byte_pos + i + 1)
            .collect();
        let lines_added = new_starts.len();
        self.line_starts.splice(line + 1..line + 1, new_starts);

        Ok(EditNotification::insert(byte_pos, inserted, lines_added))
    }

    /// Deletes the bytes in `range` and returns what was removed.
    ///
    /// # Errors
    ///
    /// Fails if the range is reversed, runs past the end, or splits a
    /// multibyte sequence.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<Removed> {
        if range.start > range.end {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.check_boundary(range.start)?;
        self.check_boundary(range.end)?;

        let bytes: Vec<u8> = self
            .bytes
            .iter()
            .skip(range.start)
            .take(range.len())
            .copied()
            .collect();
        self.bytes.remove_range(range.start, range.len());

        // A line start `s` disappears when its break at `s - 1` was deleted.
        let first = self.line_starts.partition_point(|&s| s <= range.start);
        let last = self.line_starts.partition_point(|&s| s <= range.end);
        self.line_starts.drain(first..last);
        for start in &mut self.line_starts[first..] {
            *start -= range.len();
        }

        Ok(Removed {
            position: range.start,
            bytes,
            lines_removed: last - first,
        })
    }

    fn check_boundary(&self, byte_pos: usize) -> BufferResult<()> {
        let len = self.bytes.len();
        if byte_pos > len {
            return Err(BufferError::PositionOutOfBounds {
                position: byte_pos,
                len,
            });
        }
        if byte_pos < len && units::is_continuation(self.bytes[byte_pos]) {
            return Err(BufferError::NotCharBoundary(byte_pos));
        }
        Ok(())
    }
}

impl TextEngine for Utf8Text {
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_from_byte_position(&self, byte_pos: usize) -> usize {
        debug_assert!(byte_pos <= self.bytes.len());
        self.line_starts.partition_point(|&s| s <= byte_pos) - 1
    }

    fn byte_start_of_line(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    fn byte_length_of_line(&self, line: usize) -> usize {
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.bytes.len());
        end - self.line_starts[line]
    }

    fn total_byte_length(&self) -> usize {
        self.bytes.len()
    }

    fn byte_range(&self, byte_pos: usize, byte_len: usize) -> Cow<'_, [u8]> {
        let end = byte_pos + byte_len;
        let (head, tail) = self.bytes.as_slices();
        if end <= head.len() {
            Cow::Borrowed(&head[byte_pos..end])
        } else if byte_pos >= head.len() {
            Cow::Borrowed(&tail[byte_pos - head.len()..end - head.len()])
        } else {
            let mut joined = head[byte_pos..].to_vec();
            joined.extend_from_slice(&tail[..end - head.len()]);
            Cow::Owned(joined)
        }
    }

    fn next_code_point_byte_position(&self, byte_pos: usize) -> usize {
        let len = self.bytes.len();
        if byte_pos >= len {
            return len;
        }
        (byte_pos + units::utf8_sequence_len(self.bytes[byte_pos])).min(len)
    }
}

impl Default for Utf8Text {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Utf8Text {
    fn from(s: &str) -> Self {
        let mut text = Self::new();
        text.bytes = GapSequence::from(s.as_bytes().to_vec());
        text.line_starts.extend(
            s.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        text
    }
}

impl From<String> for Utf8Text {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditKind;

    #[test]
    fn test_lines_of_loaded_text() {
        let text = Utf8Text::from("ab\ncd\n");
        assert_eq!(text.line_count(), 3);
        assert_eq!(text.byte_start_of_line(1), 3);
        assert_eq!(text.byte_length_of_line(0), 3);
        assert_eq!(text.byte_length_of_line(2), 0);
        assert_eq!(text.line_from_byte_position(6), 2);
        assert_eq!(text.line_from_byte_position(2), 0);
    }

    #[test]
    fn test_insert_reports_lines_added() {
        let mut text = Utf8Text::from("hello");
        let note = text.insert(2, "x\ny\n").unwrap();

        assert_eq!(note.kind, EditKind::Insert);
        assert_eq!(note.lines_added, 2);
        assert_eq!(text.text(), "hex\ny\nllo");
        assert_eq!(text.line_count(), 3);
        assert_eq!(text.byte_start_of_line(2), 6);
    }

    #[test]
    fn test_delete_reports_lines_removed() {
        let mut text = Utf8Text::from("a\nb\nc\nd");
        let removed = text.delete(1..5).unwrap();

        assert_eq!(removed.bytes, b"\nb\nc");
        assert_eq!(removed.lines_removed, 2);
        assert_eq!(removed.notification().lines_added, -2);
        assert_eq!(text.text(), "a\nd");
        assert_eq!(text.line_count(), 2);
        assert_eq!(text.byte_start_of_line(1), 2);
    }

    #[test]
    fn test_rejects_bad_positions() {
        let mut text = Utf8Text::from("€");
        assert!(matches!(text.insert(1, "x"), Err(BufferError::NotCharBoundary(1))));
        assert!(matches!(
            text.insert(9, "x"),
            Err(BufferError::PositionOutOfBounds { position: 9, len: 3 })
        ));
        assert!(matches!(text.delete(2..1), Err(BufferError::InvalidRange { .. })));
    }

    #[test]
    fn test_byte_range_across_gap() {
        let mut text = Utf8Text::from("abcdef");
        text.insert(3, "XY").unwrap();

        // The gap now sits after "abcXY".
        assert_eq!(text.text(), "abcXYdef");
        assert_eq!(&*text.byte_range(1, 5), b"bcXYd");
        assert_eq!(&*text.byte_range(5, 3), b"def");
        assert_eq!(text.decode_byte_range_to_char_count(0, 8), 8);
    }

    #[test]
    fn test_next_code_point() {
        let text = Utf8Text::from("a€😀");
        assert_eq!(text.next_code_point_byte_position(0), 1);
        assert_eq!(text.next_code_point_byte_position(1), 4);
        assert_eq!(text.next_code_point_byte_position(4), 8);
        assert_eq!(text.next_code_point_byte_position(8), 8);
    }

    #[test]
    fn test_buffer_ids_are_unique() {
        assert_ne!(Utf8Text::new().id(), Utf8Text::new().id());
    }
}
