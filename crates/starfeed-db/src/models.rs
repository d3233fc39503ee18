use diesel::prelude::*;

use crate::schema::kv_store;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub updated_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = kv_store)]
pub struct NewKvEntry<'a> {
    pub key: &'a str,
    pub value: &'a [u8],
    pub updated_at: &'a str,
}
