//! Key-value table queries.

use diesel::prelude::*;

use crate::{
    models::{KvEntry, NewKvEntry},
    schema::kv_store,
};

/// Repository for key-value operations.
pub struct KvRepository;

impl KvRepository {
    /// Finds an entry by key.
    pub fn find(conn: &mut SqliteConnection, key: &str) -> QueryResult<Option<KvEntry>> {
        kv_store::table
            .filter(kv_store::key.eq(key))
            .select(KvEntry::as_select())
            .first(conn)
            .optional()
    }

    /// Inserts an entry, replacing any existing value under the same key.
    pub fn put(conn: &mut SqliteConnection, entry: &NewKvEntry) -> QueryResult<usize> {
        diesel::replace_into(kv_store::table)
            .values(entry)
            .execute(conn)
    }
}
