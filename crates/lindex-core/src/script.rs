//! Edit scripts: recorded edits that can be replayed on a document.
//!
//! ## Learning: Externally Tagged Enums
//!
//! Serde writes an enum variant as an object keyed by the variant name, so a
//! script reads naturally as JSON:
//!
//! ```json
//! [
//!   { "insert": { "at": 0, "text": "hello\n" } },
//!   { "delete": { "start": 2, "end": 4 } }
//! ]
//! ```
//!
//! Positions are character offsets (UTF-16 units).

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::CoreResult;

/// One recorded edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp {
    /// Insert `text` at character offset `at`
    Insert { at: usize, text: String },
    /// Delete the characters in `start..end`
    Delete { start: usize, end: usize },
}

impl EditOp {
    /// Creates an insert op.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::Insert {
            at,
            text: text.into(),
        }
    }

    /// Creates a delete op.
    pub fn delete(range: Range<usize>) -> Self {
        Self::Delete {
            start: range.start,
            end: range.end,
        }
    }
}

/// Parses a JSON array of edits.
pub fn parse_script(json: &str) -> CoreResult<Vec<EditOp>> {
    Ok(serde_json::from_str(json)?)
}
