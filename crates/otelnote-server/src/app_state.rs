//! Shared application state for the note service.
//!
//! Everything a handler needs is passed in explicitly: the store, the
//! metrics registry, and the content limit. There is no global registry
//! and no ambient request context.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::obs::NoteMetrics;
use crate::store::NoteStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn NoteStore>,
    metrics: Arc<NoteMetrics>,
    max_content_chars: usize,
}

impl AppState {
    pub fn new(cfg: &ServiceConfig, store: Arc<dyn NoteStore>, metrics: Arc<NoteMetrics>) -> Self {
        Self {
            store,
            metrics,
            max_content_chars: cfg.storage.max_content_chars,
        }
    }

    pub fn store(&self) -> &dyn NoteStore {
        self.store.as_ref()
    }

    pub fn metrics(&self) -> Arc<NoteMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }
}
