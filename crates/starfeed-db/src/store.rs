//! The key-value store contract and its implementations.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use starfeed_utils::path::ensure_parent_dir;
use tracing::debug;

use crate::{
    connection::DbConnection,
    error::{DbError, Result},
    models::NewKvEntry,
    repository::KvRepository,
};

/// A store holding named byte blobs.
///
/// Each call is atomic on its own: a reader sees either the previous value
/// or the complete new one.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or [`DbError::NotFound`].
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<DbConnection>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ensure_parent_dir(&path)?;
        let conn = DbConnection::open(&path)?;
        debug!(path = %path.as_ref().display(), "opened key-value store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DbConnection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let mut conn = self.conn.lock().map_err(|_| DbError::PoisonError)?;
        KvRepository::find(conn.conn(), key)?
            .map(|entry| entry.value)
            .ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        let entry = NewKvEntry {
            key,
            value,
            updated_at: &updated_at,
        };

        let mut conn = self.conn.lock().map_err(|_| DbError::PoisonError)?;
        conn.conn()
            .immediate_transaction(|conn| KvRepository::put(conn, &entry))?;

        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

/// In-memory store for headless use and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let entries = self.entries.lock().map_err(|_| DbError::PoisonError)?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| DbError::PoisonError)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
