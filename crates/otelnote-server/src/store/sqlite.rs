//! SQLite-backed store.
//!
//! One connection guarded by a mutex; every call runs on the blocking pool
//! so request tasks never wait on disk I/O inside the async executor.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use otelnote_core::error::{NoteError, Result};
use otelnote_core::{Note, NoteId};

use super::NoteStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content VARCHAR(500) NOT NULL
)";

pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoteStore {
    /// Open (or create) the database file and ensure the table exists.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        tracing::info!(path, "sqlite database opened");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(storage_err)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, []).map_err(storage_err)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| NoteError::Storage("sqlite connection mutex poisoned".into()))?;
            f(&*guard).map_err(storage_err)
        })
        .await
        .map_err(|e| NoteError::Internal(format!("blocking task failed: {e}")))?
    }
}

fn storage_err(e: rusqlite::Error) -> NoteError {
    NoteError::Storage(e.to_string())
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn insert(&self, content: String) -> Result<Note> {
        self.run(move |conn| {
            conn.execute("INSERT INTO note (content) VALUES (?1)", params![content])?;
            Ok(Note {
                id: NoteId(conn.last_insert_rowid()),
                content,
            })
        })
        .await
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>> {
        self.run(move |conn| {
            conn.query_row(
                "SELECT content FROM note WHERE id = ?1",
                params![id.0],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map(|content| content.map(|content| Note { id, content }))
        })
        .await
    }

    async fn update(&self, id: NoteId, content: String) -> Result<Option<Note>> {
        self.run(move |conn| {
            let n = conn.execute(
                "UPDATE note SET content = ?1 WHERE id = ?2",
                params![content, id.0],
            )?;
            Ok((n > 0).then_some(Note { id, content }))
        })
        .await
    }

    async fn delete(&self, id: NoteId) -> Result<bool> {
        self.run(move |conn| {
            let n = conn.execute("DELETE FROM note WHERE id = ?1", params![id.0])?;
            Ok(n > 0)
        })
        .await
    }

    async fn len(&self) -> Result<usize> {
        self.run(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM note", [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
