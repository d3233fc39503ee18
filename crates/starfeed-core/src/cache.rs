pub use starfeed_config::config::DEFAULT_CACHE_KEY;
use starfeed_db::{error::DbError, KeyValueStore};
use tracing::debug;

use crate::{error::FeedError, model::Snapshot, FeedResult};

/// Single-slot cache holding the latest snapshot under one key.
///
/// Writes replace the previous snapshot wholesale; atomicity comes from the
/// underlying store.
pub struct SnapshotCache<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotCache<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored snapshot.
    ///
    /// # Errors
    ///
    /// * [`FeedError::NotFound`] if nothing was stored yet or the slot is empty
    /// * [`FeedError::Decode`] if the stored bytes are not a snapshot
    /// * [`FeedError::Read`] if the store itself failed
    pub fn load(&self) -> FeedResult<Snapshot> {
        let bytes = self.store.get(&self.key).map_err(|err| {
            match err {
                DbError::NotFound(_) => FeedError::NotFound {
                    key: self.key.clone(),
                },
                source => FeedError::Read {
                    key: self.key.clone(),
                    source,
                },
            }
        })?;

        if bytes.is_empty() {
            return Err(FeedError::NotFound {
                key: self.key.clone(),
            });
        }

        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|source| {
            FeedError::Decode {
                what: format!("cached snapshot '{}'", self.key),
                source,
            }
        })?;
        debug!(key = %self.key, releases = snapshot.len(), "loaded cached snapshot");
        Ok(snapshot)
    }

    /// Replaces the stored snapshot with `snapshot`.
    pub fn store(&self, snapshot: &Snapshot) -> FeedResult<()> {
        let bytes = serde_json::to_vec(snapshot).map_err(FeedError::Encode)?;
        self.store.set(&self.key, &bytes).map_err(|source| {
            FeedError::Write {
                key: self.key.clone(),
                source,
            }
        })?;
        debug!(key = %self.key, releases = snapshot.len(), bytes = bytes.len(), "stored snapshot");
        Ok(())
    }
}
