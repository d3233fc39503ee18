use std::error::Error;

use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const KV_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/kv");

pub fn apply_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    conn.run_pending_migrations(KV_MIGRATIONS)?;
    Ok(())
}
