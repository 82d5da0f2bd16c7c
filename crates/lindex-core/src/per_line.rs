//! Per-line records stored in the line index.
//!
//! ## Learning: Interior Mutability with `Cell`
//!
//! Whether a line holds any non-ASCII character is worked out on the first
//! query and cached in the record. The query methods take `&self`, so the
//! cache lives in a `Cell`: a read may fill it in place. `Cell` is not
//! `Sync`, which matches how the index is used (one owner, one thread).

use std::cell::Cell;

/// Cached answer to "does this line contain a multibyte character?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multibyte {
    /// Not determined since the line was last edited
    #[default]
    Unknown,
    /// Every character is a single byte
    No,
    /// At least one character takes more than one byte
    Yes,
}

/// One line of the index.
#[derive(Debug, Clone, Default)]
pub struct PerLine {
    /// Character offset of the line start, before the pending step delta.
    /// Signed because folding a step backwards can take it below zero.
    pub(crate) start: isize,

    /// Cached multibyte determination
    multibyte: Cell<Multibyte>,
}

impl PerLine {
    /// Creates a record starting at `start` with an unknown multibyte state.
    pub fn new(start: isize) -> Self {
        Self {
            start,
            multibyte: Cell::new(Multibyte::Unknown),
        }
    }

    /// Raw start, without the step delta.
    #[inline]
    pub fn start(&self) -> isize {
        self.start
    }

    /// Cached multibyte state.
    #[inline]
    pub fn multibyte(&self) -> Multibyte {
        self.multibyte.get()
    }

    /// Stores the multibyte state.
    #[inline]
    pub fn set_multibyte(&self, state: Multibyte) {
        self.multibyte.set(state);
    }

    /// Forgets the cached multibyte state after an edit.
    #[inline]
    pub fn invalidate(&self) {
        self.multibyte.set(Multibyte::Unknown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_fill_and_invalidate() {
        let line = PerLine::new(4);
        assert_eq!(line.start(), 4);
        assert_eq!(line.multibyte(), Multibyte::Unknown);

        line.set_multibyte(Multibyte::Yes);
        assert_eq!(line.multibyte(), Multibyte::Yes);

        line.invalidate();
        assert_eq!(line.multibyte(), Multibyte::Unknown);
    }
}
