use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use otelnote_core::error::Result;
use otelnote_core::{Note, NoteId};

use super::NoteStore;

/// DashMap-backed store. Ids come from a counter and are never reused.
pub struct InMemoryNoteStore {
    notes: DashMap<i64, String>,
    next_id: AtomicI64,
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn insert(&self, content: String) -> Result<Note> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.notes.insert(id, content.clone());
        Ok(Note { id: NoteId(id), content })
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>> {
        Ok(self.notes.get(&id.0).map(|r| Note {
            id,
            content: r.value().clone(),
        }))
    }

    async fn update(&self, id: NoteId, content: String) -> Result<Option<Note>> {
        // get_mut holds the shard lock, so a concurrent delete cannot resurrect the row.
        match self.notes.get_mut(&id.0) {
            Some(mut slot) => {
                *slot = content.clone();
                Ok(Some(Note { id, content }))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: NoteId) -> Result<bool> {
        Ok(self.notes.remove(&id.0).is_some())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.notes.len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn ids_are_monotonic_and_not_reused() {
        let store = InMemoryNoteStore::new();
        let a = store.insert("a".into()).await.unwrap();
        let b = store.insert("b".into()).await.unwrap();
        assert!(b.id > a.id);

        assert!(store.delete(b.id).await.unwrap());
        let c = store.insert("c".into()).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn update_unknown_leaves_store_unchanged() {
        let store = InMemoryNoteStore::new();
        let a = store.insert("a".into()).await.unwrap();
        assert!(store.update(NoteId(999), "x".into()).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 1);
        assert_eq!(store.get(a.id).await.unwrap().unwrap().content, "a");
    }

    #[tokio::test]
    async fn delete_twice_reports_missing() {
        let store = InMemoryNoteStore::new();
        let a = store.insert("a".into()).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert!(store.get(a.id).await.unwrap().is_none());
    }
}
