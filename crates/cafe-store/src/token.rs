//! # Token Store
//!
//! Persistent storage for the session token, behind a trait so the session
//! manager can run against SQLite in the app and an in-memory map in tests.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_token ──► get_token()        (process start)                    │
//! │  sign_in     ──► set_token(token)   (after a 2xx)                      │
//! │  sign_up     ──► set_token(token)                                      │
//! │  log_out     ──► remove_token()                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreResult;
use crate::repository::kv::KeyValueRepository;
use cafe_core::TOKEN_STORAGE_KEY;

/// Persistent string slot for the bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current token, if one was stored.
    async fn get_token(&self) -> StoreResult<Option<String>>;

    async fn set_token(&self, token: &str) -> StoreResult<()>;

    /// Removing an absent token succeeds.
    async fn remove_token(&self) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Token store backed by the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteTokenStore {
    repo: KeyValueRepository,
    key: String,
}

impl SqliteTokenStore {
    /// Stores the token under the default `"token"` key.
    pub fn new(repo: KeyValueRepository) -> Self {
        Self::with_key(repo, TOKEN_STORAGE_KEY)
    }

    pub fn with_key(repo: KeyValueRepository, key: impl Into<String>) -> Self {
        SqliteTokenStore {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn get_token(&self) -> StoreResult<Option<String>> {
        self.repo.get(&self.key).await
    }

    async fn set_token(&self, token: &str) -> StoreResult<()> {
        self.repo.set(&self.key, token).await
    }

    async fn remove_token(&self) -> StoreResult<()> {
        let existed = self.repo.remove(&self.key).await?;
        debug!(existed, "Token removed");
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a token already stored.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(TOKEN_STORAGE_KEY.to_string(), token.into());
        MemoryTokenStore {
            slots: RwLock::new(slots),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> StoreResult<Option<String>> {
        Ok(self.slots.read().await.get(TOKEN_STORAGE_KEY).cloned())
    }

    async fn set_token(&self, token: &str) -> StoreResult<()> {
        self.slots
            .write()
            .await
            .insert(TOKEN_STORAGE_KEY.to_string(), token.to_string());
        Ok(())
    }

    async fn remove_token(&self) -> StoreResult<()> {
        self.slots.write().await.remove(TOKEN_STORAGE_KEY);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
