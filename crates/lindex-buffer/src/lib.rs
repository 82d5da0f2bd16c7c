//! # Lindex Buffer
//!
//! Storage-side building blocks for the line index.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Generic Containers
//! - `GapSequence<T>` is one gap buffer for any `T: Default`; the line index
//!   stores per-line records in it and `Utf8Text` stores bytes in it
//! - Element moves are plain index arithmetic on a `Vec<T>`, no `unsafe`
//!
//! ### Traits at the Seams
//! - `TextEngine` is everything the line index needs to know about the text
//! - `EditNotification` is the only way edits reach the index

mod engine;
mod gap;
mod text;
pub mod units;

pub use engine::{EditKind, EditNotification, TextEngine};
pub use gap::{GapSequence, Iter};
pub use text::{BufferId, Removed, Utf8Text};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Byte position {position} is out of bounds (length {len})")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("Byte position {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Utf8Text::new();
        assert!(text.is_empty());
        assert_eq!(text.line_count(), 1);
        assert_eq!(text.total_byte_length(), 0);
    }

    #[test]
    fn test_text_from_string() {
        let text = Utf8Text::from("Hello, World!");
        assert_eq!(text.total_byte_length(), 13);
        assert_eq!(text.text(), "Hello, World!");
    }

    #[test]
    fn test_insert_and_delete() {
        let mut text = Utf8Text::new();
        text.insert(0, "Hello").unwrap();
        text.insert(5, ", World!").unwrap();
        assert_eq!(text.text(), "Hello, World!");

        text.delete(5..7).unwrap();
        assert_eq!(text.text(), "HelloWorld!");
    }

    #[test]
    fn test_line_operations() {
        let text = Utf8Text::from("Line 1\nLine 2\nLine 3");
        assert_eq!(text.line_count(), 3);
        assert_eq!(&*text.byte_range(text.byte_start_of_line(1), text.byte_length_of_line(1)), b"Line 2\n");
        assert_eq!(text.byte_length_of_line(2), 6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Utf8Text::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, BufferError::Io(_)));
    }
}
