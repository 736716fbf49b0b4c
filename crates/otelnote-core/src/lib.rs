//! otelnote core: the note model, wire bodies, and error surface.
//!
//! This crate is shared by the HTTP server and its tests. It carries no
//! runtime, storage, or telemetry dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every fallible path surfaces as `NoteError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod note;
pub mod protocol;

/// Shared result type.
pub use error::{NoteError, Result};
pub use note::{Note, NoteId};
