//! # Database State
//!
//! Wraps the local SQLite `Database` that backs the token store.
//!
//! ## Thread Safety
//! The `Database` holds a `SqlitePool`, which is thread-safe. The token
//! store hands out repositories that share the pool.

use std::sync::Arc;

use cafe_store::{Database, DbConfig, SqliteTokenStore, StoreResult};
use tracing::info;

/// Wrapper around the local `Database`.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Opens (or creates) the database and applies migrations.
    pub async fn open(config: DbConfig) -> StoreResult<Self> {
        let db = Database::new(config).await?;
        info!("Token store ready");
        Ok(DbState { db })
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Token store persisting under `key`.
    pub fn token_store(&self, key: &str) -> Arc<SqliteTokenStore> {
        Arc::new(SqliteTokenStore::with_key(self.db.key_values(), key))
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
