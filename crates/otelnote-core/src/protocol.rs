//! JSON bodies exchanged on the `/note` routes.
//!
//! Request: `{"content": "..."}` (extra fields are ignored).
//! Responses: `{"id": n}` for create/update, `{"content": "..."}` for read,
//! `{"error": CODE, "message": "..."}` for failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NoteError, Result};
use crate::note::NoteId;

/// Body of `POST /note` and `PUT /note/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteBody {
    pub content: String,
}

impl NoteBody {
    /// Decode a request body once. Any shape error is a client error.
    ///
    /// Only a JSON object is accepted: derived structs would otherwise also
    /// deserialize from a sequence like `["text"]`.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| NoteError::BadRequest(format!("invalid JSON body: {e}")))?;
        if !value.is_object() {
            return Err(NoteError::BadRequest("request body must be a JSON object".into()));
        }
        serde_json::from_value(value)
            .map_err(|e| NoteError::BadRequest(format!("invalid note body: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteIdBody {
    pub id: NoteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContentBody {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl From<&NoteError> for ErrorBody {
    fn from(e: &NoteError) -> Self {
        Self {
            error: e.client_code().as_str().to_string(),
            message: e.to_string(),
        }
    }
}
