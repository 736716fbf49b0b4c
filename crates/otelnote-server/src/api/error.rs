//! HTTP mapping for `NoteError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use otelnote_core::error::{ClientCode, NoteError};
use otelnote_core::protocol::ErrorBody;

/// Wrapper so handlers can return `NoteError` through `?`.
#[derive(Debug)]
pub struct ApiError(pub NoteError);

impl From<NoteError> for ApiError {
    fn from(e: NoteError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::from(&self.0))).into_response()
    }
}
