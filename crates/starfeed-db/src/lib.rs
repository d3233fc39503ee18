pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use store::{KeyValueStore, MemoryStore, SqliteStore};
