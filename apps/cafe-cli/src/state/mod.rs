//! # State Module
//!
//! Builds and holds the client containers for one CLI invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ClientConfig ──► AppState::init                                        │
//! │                        │                                                │
//! │          ┌─────────────┼──────────────────┬───────────────────┐        │
//! │          ▼             ▼                  ▼                   ▼         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌────────────────┐ │
//! │  │   DbState    │ │SessionManager│ │CatalogManager│ │CategoryService │ │
//! │  │              │ │              │ │              │ │                │ │
//! │  │  SQLite pool │ │  token/user  │ │  product     │ │  read-through  │ │
//! │  │  token store │ │  status      │ │  list        │ │                │ │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘ └───────┬────────┘ │
//! │         │                └────────────────┼─────────────────┘          │
//! │         │                                 ▼                            │
//! │         └──────── TokenStore ───────► CafeApi (shared Arc)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands borrow only the container they need.

mod db;

pub use db::DbState;

use std::sync::Arc;

use cafe_client::{CafeApi, CatalogManager, CategoryService, ClientConfig, SessionManager};
use cafe_core::AuthStatus;
use cafe_store::{DbConfig, TokenStore};
use tracing::info;

use crate::error::ApiError;

/// Everything a command can ask for.
#[derive(Debug)]
pub struct AppState {
    pub config: ClientConfig,
    pub db: DbState,
    pub session: Arc<SessionManager>,
    pub catalog: Arc<CatalogManager>,
    pub categories: CategoryService,
}

impl AppState {
    /// Opens the token store and wires the managers to one shared client.
    ///
    /// The session starts in `Checking`; call [`AppState::resolve_session`]
    /// before running a command.
    pub async fn init(config: ClientConfig) -> Result<Self, ApiError> {
        let db_path = config.database_path();
        info!(?db_path, "Database path determined");

        let db = DbState::open(DbConfig::new(db_path)).await?;
        let tokens: Arc<dyn TokenStore> = db.token_store(&config.session.token_key);

        let api = Arc::new(CafeApi::new(&config.api, tokens.clone())?);
        info!(base_url = %api.base_url(), "API client ready");

        let session = Arc::new(SessionManager::new(api.clone(), tokens, &config.session));
        let catalog = Arc::new(CatalogManager::new(api.clone(), config.api.products_limit));
        let categories = CategoryService::new(api);

        Ok(AppState {
            config,
            db,
            session,
            catalog,
            categories,
        })
    }

    /// Validates the stored token against the backend.
    pub async fn resolve_session(&self) -> Result<AuthStatus, ApiError> {
        let status = self.session.check_token().await?;
        info!(%status, "Session resolved");
        Ok(status)
    }

    /// Fails unless the session is authenticated.
    pub fn require_auth(&self) -> Result<(), ApiError> {
        if self.session.snapshot().is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::auth("Not logged in. Run `cafe login` first."))
        }
    }

    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}
