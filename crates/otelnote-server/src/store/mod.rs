//! Note persistence.
//!
//! Handlers only see `dyn NoteStore`. Every method is a single committed
//! operation; there is no retry here, storage failures surface as
//! `NoteError::Storage`.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use otelnote_core::error::Result;
use otelnote_core::{Note, NoteId};

use crate::config::{StorageBackend, StorageSection};

pub use memory::InMemoryNoteStore;
pub use sqlite::SqliteNoteStore;

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert and return the note with its newly assigned id.
    async fn insert(&self, content: String) -> Result<Note>;

    async fn get(&self, id: NoteId) -> Result<Option<Note>>;

    /// Overwrite content. `None` when the id is unknown (nothing written).
    async fn update(&self, id: NoteId, content: String) -> Result<Option<Note>>;

    /// Remove the note. `false` when the id is unknown.
    async fn delete(&self, id: NoteId) -> Result<bool>;

    async fn len(&self) -> Result<usize>;

    fn backend(&self) -> &'static str;
}

/// Open the configured backend.
pub fn build(cfg: &StorageSection) -> Result<Arc<dyn NoteStore>> {
    let store: Arc<dyn NoteStore> = match cfg.backend {
        StorageBackend::Memory => Arc::new(InMemoryNoteStore::new()),
        StorageBackend::Sqlite => Arc::new(SqliteNoteStore::open(&cfg.path)?),
    };
    tracing::info!(backend = store.backend(), "note store ready");
    Ok(store)
}
