//! Shared error type across otelnote crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientCode {
    /// Missing field, malformed JSON, or content out of bounds.
    BadRequest,
    /// Unknown note identifier.
    NotFound,
    /// Storage or other server-side failure.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Carries the id as the client sent it.
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl NoteError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            NoteError::BadRequest(_) => ClientCode::BadRequest,
            NoteError::NotFound(_) => ClientCode::NotFound,
            NoteError::Storage(_) | NoteError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for errors caused by the server rather than the request.
    pub fn is_server_side(&self) -> bool {
        self.client_code() == ClientCode::Internal
    }
}
