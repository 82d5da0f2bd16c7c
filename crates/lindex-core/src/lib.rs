//! # Lindex Core
//!
//! Incremental line index for a UTF-8 text engine addressed in UTF-16 units.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Document                        │
//! │  ┌──────────────┐  EditNotification  ┌────────────┐  │
//! │  │   Utf8Text   │ ─────────────────▶ │ LineIndex  │  │
//! │  │ (TextEngine) │ ◀───────────────── │ (step +    │  │
//! │  └──────────────┘   line / byte      │  PerLine   │  │
//! │                     queries          │  records)  │  │
//! │                                      └────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! - `line_index` holds the data structure; it only knows the `TextEngine`
//!   trait, never a concrete engine
//! - `document` wires a concrete engine to an index

pub mod config;
pub mod document;
pub mod line_index;
pub mod per_line;
pub mod script;

pub use config::{Config, ConfigError, DocumentConfig};
pub use document::Document;
pub use line_index::{LineIndex, LineSpan};
pub use per_line::{Multibyte, PerLine};
pub use script::{parse_script, EditOp};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Character position {position} is out of bounds (length {len})")]
    CharPositionOutOfBounds { position: usize, len: usize },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Buffer error: {0}")]
    Buffer(#[from] lindex_buffer::BufferError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Script error: {0}")]
    Script(#[from] serde_json::Error),
}

/// Invariant violations found by [`LineIndex::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("First line starts at {0}, expected 0")]
    FirstLineOffset(isize),

    #[error("Line {line} starts at {start} but the next line starts at {next}")]
    Decreasing { line: usize, start: isize, next: isize },

    #[error("Step line {step_line} is outside a table of {records} records")]
    StepOutOfRange { step_line: usize, records: usize },

    #[error("Index has {index} lines, engine has {engine}")]
    LineCountMismatch { index: usize, engine: usize },

    #[error("Line {line} has {actual} characters in the index, {expected} in the engine")]
    LineLengthMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::default();
        assert_eq!(doc.index().count(), 1);
        assert_eq!(doc.index().text_length(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::from(IndexError::LineCountMismatch { index: 2, engine: 3 });
        assert_eq!(err.to_string(), "Index error: Index has 2 lines, engine has 3");
    }
}
