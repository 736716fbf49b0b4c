//! The note entity and its content rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NoteError, Result};

/// Default upper bound on note content, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 500;

/// Server-assigned note identifier. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl NoteId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<i64>().map(NoteId)
    }
}

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
}

/// Check content against the configured length bound.
///
/// Length is counted in chars, not bytes. Empty content is allowed.
pub fn validate_content(content: &str, max_chars: usize) -> Result<()> {
    let n = content.chars().count();
    if n > max_chars {
        return Err(NoteError::BadRequest(format!(
            "content is {n} characters, limit is {max_chars}"
        )));
    }
    Ok(())
}
