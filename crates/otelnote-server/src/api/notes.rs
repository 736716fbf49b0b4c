//! CRUD handlers.
//!
//! Each handler runs its operation, then reports the outcome once: a
//! successful store commit bumps exactly one verb counter, a failure bumps
//! the error series instead. Counting happens after the commit so failed
//! writes are never counted.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use otelnote_core::error::{NoteError, Result};
use otelnote_core::note::validate_content;
use otelnote_core::protocol::{NoteBody, NoteContentBody, NoteIdBody};
use otelnote_core::NoteId;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::obs::Verb;

/// Unparseable ids can never match a row, so they are plain 404s.
fn parse_id(raw: &str) -> Result<NoteId> {
    raw.parse::<NoteId>()
        .map_err(|_| NoteError::NotFound(raw.to_string()))
}

/// Decode and bound-check a request body before any storage access.
fn read_body(state: &AppState, raw: &[u8]) -> Result<String> {
    let body = NoteBody::decode(raw)?;
    validate_content(&body.content, state.max_content_chars())?;
    Ok(body.content)
}

/// Record the outcome and turn it into a response.
fn finish(state: &AppState, verb: Verb, started: Instant, result: Result<Response>) -> Response {
    let metrics = state.metrics();
    let resp = match result {
        Ok(resp) => {
            metrics.record(verb);
            resp
        }
        Err(e) => {
            if e.is_server_side() {
                tracing::error!(method = verb.method(), error = %e, "note request failed");
            } else {
                tracing::debug!(method = verb.method(), error = %e, "note request rejected");
            }
            metrics.record_error(verb, e.client_code().as_str());
            ApiError(e).into_response()
        }
    };
    metrics.observe_duration(verb, resp.status().as_u16(), started.elapsed());
    resp
}

/// `POST /note`
pub async fn create_note(State(state): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let result = create(&state, &body).await;
    finish(&state, Verb::Post, started, result)
}

async fn create(state: &AppState, body: &[u8]) -> Result<Response> {
    let content = read_body(state, body)?;
    let note = state.store().insert(content).await?;
    tracing::debug!(id = %note.id, "note created");
    Ok((StatusCode::CREATED, Json(NoteIdBody { id: note.id })).into_response())
}

/// `GET /note/:id`
pub async fn get_note(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let started = Instant::now();
    let result = read(&state, &raw_id).await;
    finish(&state, Verb::Get, started, result)
}

async fn read(state: &AppState, raw_id: &str) -> Result<Response> {
    let id = parse_id(raw_id)?;
    let note = state
        .store()
        .get(id)
        .await?
        .ok_or_else(|| NoteError::NotFound(raw_id.to_string()))?;
    Ok((StatusCode::OK, Json(NoteContentBody { content: note.content })).into_response())
}

/// `PUT /note/:id`
pub async fn update_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let result = update(&state, &raw_id, &body).await;
    finish(&state, Verb::Put, started, result)
}

async fn update(state: &AppState, raw_id: &str, body: &[u8]) -> Result<Response> {
    // Body first: an invalid request never touches storage.
    let content = read_body(state, body)?;
    let id = parse_id(raw_id)?;
    let note = state
        .store()
        .update(id, content)
        .await?
        .ok_or_else(|| NoteError::NotFound(raw_id.to_string()))?;
    tracing::debug!(id = %note.id, "note updated");
    Ok((StatusCode::OK, Json(NoteIdBody { id: note.id })).into_response())
}

/// `DELETE /note/:id`
///
/// A missing id is a 404, not an idempotent 204.
pub async fn delete_note(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let started = Instant::now();
    let result = delete(&state, &raw_id).await;
    finish(&state, Verb::Delete, started, result)
}

async fn delete(state: &AppState, raw_id: &str) -> Result<Response> {
    let id = parse_id(raw_id)?;
    if !state.store().delete(id).await? {
        return Err(NoteError::NotFound(raw_id.to_string()));
    }
    tracing::debug!(%id, "note deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
