//! Request counters and their export.
//!
//! `metrics` holds the in-process registry (atomics, owned by `AppState`).
//! `otel` binds that registry to an OTLP/gRPC periodic push.

pub mod metrics;
pub mod otel;

pub use metrics::{NoteMetrics, Verb};
