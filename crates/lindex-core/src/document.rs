//! A text buffer paired with its line index.
//!
//! ## Learning: Composition over Inheritance
//!
//! `Document` owns a `Utf8Text` and a `LineIndex` and is the only code that
//! edits the text. Every edit produces a notification that is handed to the
//! index in the same call, so the index can never see edits out of order or
//! edits meant for a different buffer.

use lindex_buffer::{BufferId, TextEngine, Utf8Text};
use std::ops::Range;
use std::path::Path;

use crate::config::DocumentConfig;
use crate::line_index::LineIndex;
use crate::script::EditOp;
use crate::{CoreError, CoreResult};

/// An open document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The text engine
    text: Utf8Text,

    /// Line starts of `text`
    index: LineIndex,

    /// Buffer the index was last rebuilt against
    indexed: BufferId,

    /// Document settings
    config: DocumentConfig,
}

impl Document {
    /// Creates an empty document.
    pub fn new(config: DocumentConfig) -> Self {
        Self::with_text(Utf8Text::new(), config)
    }

    /// Creates a document over an existing text.
    pub fn with_text(text: Utf8Text, config: DocumentConfig) -> Self {
        let mut index = LineIndex::with_capacity(config.initial_line_capacity);
        index.rebuild_line_data(&text);
        Self {
            indexed: text.id(),
            text,
            index,
            config,
        }
    }

    /// Opens a document from a file.
    pub fn open(path: impl AsRef<Path>, config: DocumentConfig) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = Utf8Text::from_file(path)?;
        tracing::info!(path = %path.display(), bytes = text.total_byte_length(), "opened document");
        Ok(Self::with_text(text, config))
    }

    // ==================== Accessors ====================

    /// The line index.
    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    /// The text engine.
    pub fn text(&self) -> &Utf8Text {
        &self.text
    }

    /// Identity of the current backing buffer.
    pub fn id(&self) -> BufferId {
        self.text.id()
    }

    /// Document settings.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Swaps in a different backing buffer and rebuilds the index for it.
    pub fn replace_text(&mut self, text: Utf8Text) {
        self.text = text;
        self.index.rebuild_line_data(&self.text);
        self.indexed = self.text.id();
    }

    // ==================== Character-Addressed Edits ====================

    /// Inserts `s` at character offset `char_pos`.
    pub fn insert(&mut self, char_pos: usize, s: &str) -> CoreResult<()> {
        self.check_char_position(char_pos)?;
        let byte_pos = self.index.char_to_wide_byte_position(&self.text, char_pos);
        self.insert_bytes(byte_pos, s)
    }

    /// Deletes the characters in `range`.
    pub fn delete(&mut self, range: Range<usize>) -> CoreResult<()> {
        if range.start > range.end {
            return Err(CoreError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.check_char_position(range.end)?;

        let start = self.index.char_to_wide_byte_position(&self.text, range.start);
        let end = self.index.char_to_wide_byte_position(&self.text, range.end);
        self.delete_bytes(start..end)
    }

    /// Applies one step of an edit script.
    pub fn apply(&mut self, op: &EditOp) -> CoreResult<()> {
        match op {
            EditOp::Insert { at, text } => self.insert(*at, text),
            EditOp::Delete { start, end } => self.delete(*start..*end),
        }
    }

    fn check_char_position(&self, char_pos: usize) -> CoreResult<()> {
        let len = self.index.text_length();
        if char_pos > len {
            return Err(CoreError::CharPositionOutOfBounds {
                position: char_pos,
                len,
            });
        }
        Ok(())
    }

    // ==================== Byte-Addressed Edits ====================

    /// Inserts `s` at byte offset `byte_pos`.
    pub fn insert_bytes(&mut self, byte_pos: usize, s: &str) -> CoreResult<()> {
        let note = self.text.insert(byte_pos, s)?;
        self.index.on_edit(&self.text, &note);
        self.after_edit()
    }

    /// Deletes the bytes in `range`.
    pub fn delete_bytes(&mut self, range: Range<usize>) -> CoreResult<()> {
        let removed = self.text.delete(range)?;
        self.index.on_edit(&self.text, &removed.notification());
        self.after_edit()
    }

    fn after_edit(&self) -> CoreResult<()> {
        debug_assert_eq!(self.indexed, self.text.id(), "index belongs to another buffer");

        if self.config.verify_after_edit {
            if let Err(e) = self.index.verify_against(&self.text) {
                tracing::warn!(error = %e, "line index out of sync with text");
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::with_text(Utf8Text::from(s), DocumentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use lindex_buffer::BufferError;

    fn checked() -> DocumentConfig {
        DocumentConfig {
            verify_after_edit: true,
            ..DocumentConfig::default()
        }
    }

    #[test]
    fn test_char_addressed_edits() {
        let mut doc = Document::new(checked());
        doc.insert(0, "hello\nworld").unwrap();
        assert_eq!(doc.index().count(), 2);
        assert_eq!(doc.index().char_position_from_line(1), 6);

        doc.delete(5..6).unwrap();
        assert_eq!(doc.text().text(), "helloworld");
        assert_eq!(doc.index().count(), 1);
        assert_eq!(doc.index().text_length(), 10);
    }

    #[test]
    fn test_edits_after_astral_characters() {
        let mut doc = Document::new(checked());
        doc.insert(0, "😀😀\n").unwrap();
        // Four UTF-16 units precede the newline.
        doc.insert(4, "!").unwrap();
        assert_eq!(doc.text().text(), "😀😀!\n");

        doc.delete(2..4).unwrap();
        assert_eq!(doc.text().text(), "😀!\n");
        assert_eq!(doc.index().text_length(), 4);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut doc = Document::from("abc");
        assert!(matches!(
            doc.insert(4, "x"),
            Err(CoreError::CharPositionOutOfBounds { position: 4, len: 3 })
        ));
        assert!(matches!(doc.delete(2..1), Err(CoreError::InvalidRange { .. })));
        assert!(matches!(
            doc.insert_bytes(10, "x"),
            Err(CoreError::Buffer(BufferError::PositionOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_replace_text_rebuilds() {
        let mut doc = Document::from("one line");
        let old_id = doc.id();

        doc.replace_text(Utf8Text::from("a\nb\nc"));
        assert_ne!(doc.id(), old_id);
        assert_eq!(doc.index().count(), 3);
        assert!(doc.index().verify_against(doc.text()).is_ok());

        doc.insert(1, "\n").unwrap();
        assert_eq!(doc.index().count(), 4);
    }

    #[test]
    fn test_apply_script() {
        let ops = parse_script(
            r#"[
                {"insert": {"at": 0, "text": "abc\ndef"}},
                {"insert": {"at": 4, "text": "€"}},
                {"delete": {"start": 0, "end": 2}}
            ]"#,
        )
        .unwrap();

        let mut doc = Document::new(checked());
        for op in &ops {
            doc.apply(op).unwrap();
        }

        assert_eq!(doc.text().text(), "c\n€def");
        assert_eq!(doc.index().char_position_from_line(1), 2);
        assert_eq!(doc.index().char_to_byte_position(doc.text(), 3), 5);
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, "α\nβ\n").unwrap();

        let doc = Document::open(&path, checked()).unwrap();
        assert_eq!(doc.index().count(), 3);
        assert_eq!(doc.index().text_length(), 4);
    }

    #[test]
    fn test_open_missing_file_is_buffer_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Document::open(dir.path().join("missing.txt"), checked());
        assert!(matches!(result, Err(CoreError::Buffer(BufferError::Io(_)))));
    }
}
