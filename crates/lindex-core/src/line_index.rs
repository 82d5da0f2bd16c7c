//! Incremental index of line starts in character and byte units.
//!
//! ## The Problem
//!
//! Callers address text in UTF-16 code units while the engine stores UTF-8
//! bytes. Finding the line or byte offset of a character position needs the
//! character offset of every line start, and one keystroke changes the start
//! of every line after it.
//!
//! ## The Step
//!
//! Instead of rewriting every following start on each edit, the index keeps
//! one pending delta:
//!
//! ```text
//!   records:   0    1    2  | 3    4    5    6 (sentinel)
//!                           ^ step_line = 2
//!   effective start = start            for line <= step_line
//!                   = start + step_delta for line >  step_line
//! ```
//!
//! An edit on line `L` first walks `step_line` to `L`, folding the delta into
//! each record it passes, then adds its own change to `step_delta`. Typing on
//! one line therefore costs O(1) per keystroke; moving to another line costs
//! one record per line travelled.
//!
//! ## Learning: Asserting Preconditions
//!
//! Positions out of range are caller bugs, not runtime conditions. They panic
//! (in debug builds at least) instead of returning `Result`.

use lindex_buffer::{units, EditKind, EditNotification, GapSequence, TextEngine};

use crate::per_line::{Multibyte, PerLine};
use crate::IndexError;

/// One line as seen through the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// Line number (0-indexed)
    pub line: usize,
    /// Character offset of the line start
    pub start: usize,
    /// Length in characters, terminator included
    pub length: usize,
}

/// Line starts of one document, kept in step with its text engine.
///
/// The table holds one [`PerLine`] per line plus a terminal sentinel whose
/// start is the document's character length.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Per-line records plus the sentinel
    table: GapSequence<PerLine>,

    /// Last record that is up to date
    step_line: usize,

    /// Delta owed to every record after `step_line`
    step_delta: isize,

    /// Records rewritten by step moves so far
    folded: usize,
}

impl LineIndex {
    /// Creates an index for an empty document.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an index for an empty document with room for `lines` lines.
    pub fn with_capacity(lines: usize) -> Self {
        let mut table = GapSequence::with_capacity(lines + 1);
        table.push(PerLine::new(0));
        table.push(PerLine::new(0));
        Self {
            table,
            step_line: 0,
            step_delta: 0,
            folded: 0,
        }
    }

    // ==================== Measurements ====================

    /// Number of lines.
    #[inline]
    pub fn count(&self) -> usize {
        self.table.len() - 1
    }

    /// Document length in characters.
    #[inline]
    pub fn text_length(&self) -> usize {
        self.char_position_from_line(self.count())
    }

    /// Number of records whose start was rewritten while moving the step.
    #[inline]
    pub fn folded_records(&self) -> usize {
        self.folded
    }

    /// Moves performed by the record table's gap so far.
    #[inline]
    pub fn table_moves(&self) -> usize {
        self.table.moved_elements()
    }

    // ==================== Line Lookup ====================

    fn effective_start(&self, line: usize) -> isize {
        let start = self.table[line].start;
        if line > self.step_line {
            start + self.step_delta
        } else {
            start
        }
    }

    /// Character offset where `line` starts.
    ///
    /// `line == count()` is allowed and returns the document length.
    pub fn char_position_from_line(&self, line: usize) -> usize {
        assert!(
            line <= self.count(),
            "char_position_from_line: line {line} out of range (count {})",
            self.count()
        );
        let start = self.effective_start(line);
        debug_assert!(start >= 0, "line {line} starts at {start}");
        start as usize
    }

    /// Length of `line` in characters, terminator included.
    pub fn char_line_length(&self, line: usize) -> usize {
        assert!(
            line < self.count(),
            "char_line_length: line {line} out of range (count {})",
            self.count()
        );
        self.char_position_from_line(line + 1) - self.char_position_from_line(line)
    }

    /// Line containing character offset `pos`.
    ///
    /// Offsets at or past the end map to the last line.
    pub fn line_from_char_position(&self, pos: usize) -> usize {
        // Greatest line in [0, count) whose start is <= pos. Line 0 starts at
        // zero, so `low` always ends at least at 1.
        let mut low = 0;
        let mut high = self.count();
        while low < high {
            let mid = low + (high - low) / 2;
            if self.char_position_from_line(mid) <= pos {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low - 1
    }

    /// Iterates every line with its start and length.
    pub fn lines(&self) -> impl Iterator<Item = LineSpan> + '_ {
        (0..self.count()).map(|line| LineSpan {
            line,
            start: self.char_position_from_line(line),
            length: self.char_line_length(line),
        })
    }

    /// Cached multibyte state of `line`, without resolving it.
    pub fn cached_multibyte(&self, line: usize) -> Multibyte {
        self.table[line].multibyte()
    }

    /// Returns true if `line` holds any character encoded in more than one
    /// byte. The answer is cached until the line is edited.
    pub fn line_contains_multibyte_char(
        &self,
        engine: &(impl TextEngine + ?Sized),
        line: usize,
    ) -> bool {
        let record = &self.table[line];
        match record.multibyte() {
            Multibyte::Yes => true,
            Multibyte::No => false,
            Multibyte::Unknown => {
                let multibyte = engine.byte_length_of_line(line) != self.char_line_length(line);
                record.set_multibyte(if multibyte {
                    Multibyte::Yes
                } else {
                    Multibyte::No
                });
                multibyte
            }
        }
    }

    // ==================== Position Conversion ====================

    /// Converts a byte offset to a character offset.
    pub fn byte_to_char_position(
        &self,
        engine: &(impl TextEngine + ?Sized),
        byte_pos: usize,
    ) -> usize {
        debug_assert!(byte_pos <= engine.total_byte_length());

        let line = engine.line_from_byte_position(byte_pos);
        let line_byte_start = engine.byte_start_of_line(line);
        let offset = byte_pos - line_byte_start;

        let chars = if self.line_contains_multibyte_char(engine, line) {
            engine.decode_byte_range_to_char_count(line_byte_start, offset)
        } else {
            offset
        };
        self.char_position_from_line(line) + chars
    }

    /// Converts a character offset to a byte offset, counting one character
    /// per code point.
    pub fn char_to_byte_position(&self, engine: &(impl TextEngine + ?Sized), pos: usize) -> usize {
        self.char_to_byte_with(engine, pos, |_| 1)
    }

    /// Converts a character offset to a byte offset, counting code points
    /// outside the Basic Multilingual Plane as two characters.
    ///
    /// An offset that falls between the two halves of a surrogate pair maps
    /// to the byte after the code point.
    pub fn char_to_wide_byte_position(
        &self,
        engine: &(impl TextEngine + ?Sized),
        pos: usize,
    ) -> usize {
        self.char_to_byte_with(engine, pos, units::utf16_width)
    }

    fn char_to_byte_with(
        &self,
        engine: &(impl TextEngine + ?Sized),
        pos: usize,
        width: impl Fn(usize) -> usize,
    ) -> usize {
        debug_assert!(
            pos <= self.text_length(),
            "char position {pos} past end {}",
            self.text_length()
        );

        let line = self.line_from_char_position(pos);
        let mut byte_pos = engine.byte_start_of_line(line);
        let offset = pos - self.char_position_from_line(line);

        if !self.line_contains_multibyte_char(engine, line) {
            return byte_pos + offset;
        }

        let line_end = byte_pos + engine.byte_length_of_line(line);
        let mut remaining = offset as isize;
        while remaining > 0 && byte_pos < line_end {
            let next = engine.next_code_point_byte_position(byte_pos);
            remaining -= width(next - byte_pos) as isize;
            byte_pos = next;
        }
        byte_pos
    }

    // ==================== Edit Tracking ====================

    /// Rebuilds the index from scratch for the text behind `engine`.
    pub fn rebuild_line_data(&mut self, engine: &(impl TextEngine + ?Sized)) {
        self.table.clear();
        self.table.push(PerLine::new(0));
        self.table.push(PerLine::new(0));
        self.step_line = 0;
        self.step_delta = 0;

        let whole = EditNotification::without_text(
            EditKind::Insert,
            0,
            engine.total_byte_length(),
            engine.line_count() as isize - 1,
        );
        self.on_edit(engine, &whole);

        tracing::debug!(
            lines = self.count(),
            chars = self.text_length(),
            bytes = engine.total_byte_length(),
            "rebuilt line data"
        );
    }

    /// Applies one edit notification.
    ///
    /// Must be called for every edit, in the order the engine made them,
    /// after the engine reflects the edit.
    pub fn on_edit(&mut self, engine: &(impl TextEngine + ?Sized), edit: &EditNotification<'_>) {
        tracing::trace!(
            kind = ?edit.kind,
            position = edit.position,
            length = edit.length,
            lines_added = edit.lines_added,
            "edit notification"
        );

        let start_line = engine.line_from_byte_position(edit.position);

        if edit.lines_added == 0 {
            let delta = match &edit.text {
                Some(bytes) => {
                    let chars = units::utf16_len(bytes) as isize;
                    match edit.kind {
                        EditKind::Insert => chars,
                        EditKind::Delete => -chars,
                    }
                }
                None => self.remeasure(engine, start_line),
            };
            self.adjust_line_length(start_line, delta);
            return;
        }

        let delta = self.remeasure(engine, start_line);
        self.adjust_line_length(start_line, delta);

        match edit.kind {
            EditKind::Insert => {
                debug_assert!(edit.lines_added > 0, "insert removed lines");
                for line in start_line + 1..=start_line + edit.lines_added as usize {
                    let length = engine.decode_byte_range_to_char_count(
                        engine.byte_start_of_line(line),
                        engine.byte_length_of_line(line),
                    );
                    self.insert_line(line, length);
                }
            }
            EditKind::Delete => {
                debug_assert!(edit.lines_added < 0, "delete added lines");
                for _ in 0..edit.lines_added.unsigned_abs() {
                    self.delete_line(start_line + 1);
                }
            }
        }
    }

    /// Difference between the engine's character length of `line` and ours.
    fn remeasure(&self, engine: &(impl TextEngine + ?Sized), line: usize) -> isize {
        let actual = engine.decode_byte_range_to_char_count(
            engine.byte_start_of_line(line),
            engine.byte_length_of_line(line),
        );
        actual as isize - self.char_line_length(line) as isize
    }

    /// Changes the length of `line` by `delta` characters.
    fn adjust_line_length(&mut self, line: usize, delta: isize) {
        self.move_step(line);
        self.step_delta += delta;
        self.table[line].invalidate();
    }

    /// Inserts a record for a new line of `length` characters at `index`.
    ///
    /// The line before `index` must already have its final length, so the
    /// record currently at `index` starts where the new line does.
    fn insert_line(&mut self, index: usize, length: usize) {
        self.move_step(index);

        let record = &mut self.table[index];
        let line_start = record.start;
        record.start += length as isize;
        self.table.insert(index, PerLine::new(line_start));

        self.step_delta += length as isize;
        self.step_line += 1;
    }

    /// Removes the record at `index`, merging its characters away.
    fn delete_line(&mut self, index: usize) {
        debug_assert!(index > 0, "the first line is never removed");
        self.move_step(index);

        self.step_delta -= self.char_line_length(index) as isize;
        self.table.remove_at(index);

        self.step_line -= 1;
    }

    /// Moves the step boundary to `line`, folding the pending delta into
    /// every record it passes.
    fn move_step(&mut self, line: usize) {
        debug_assert!(line < self.table.len());

        if self.step_delta == 0 {
            self.step_line = line;
            return;
        }

        while self.step_line < line {
            self.step_line += 1;
            self.table[self.step_line].start += self.step_delta;
            self.folded += 1;
        }
        while self.step_line > line {
            self.table[self.step_line].start -= self.step_delta;
            self.step_line -= 1;
            self.folded += 1;
        }
    }

    // ==================== Consistency ====================

    /// Checks the table's own invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn verify(&self) -> Result<(), IndexError> {
        if self.step_line >= self.table.len() {
            return Err(IndexError::StepOutOfRange {
                step_line: self.step_line,
                records: self.table.len(),
            });
        }

        let first = self.effective_start(0);
        if first != 0 {
            return Err(IndexError::FirstLineOffset(first));
        }

        for line in 0..self.count() {
            let start = self.effective_start(line);
            let next = self.effective_start(line + 1);
            if next < start {
                return Err(IndexError::Decreasing { line, start, next });
            }
        }
        Ok(())
    }

    /// Checks the table against the text it indexes.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch in line count or line length.
    pub fn verify_against(&self, engine: &(impl TextEngine + ?Sized)) -> Result<(), IndexError> {
        self.verify()?;

        if self.count() != engine.line_count() {
            return Err(IndexError::LineCountMismatch {
                index: self.count(),
                engine: engine.line_count(),
            });
        }

        for span in self.lines() {
            let expected = engine.decode_byte_range_to_char_count(
                engine.byte_start_of_line(span.line),
                engine.byte_length_of_line(span.line),
            );
            if expected != span.length {
                return Err(IndexError::LineLengthMismatch {
                    line: span.line,
                    expected,
                    actual: span.length,
                });
            }
        }
        Ok(())
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
